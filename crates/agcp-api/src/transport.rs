//! HTTP transport shared by the auth and publishing clients of one task run.

use ureq::http::{Request, Response, StatusCode};
use ureq::middleware::{Middleware, MiddlewareNext};
use ureq::{Agent, Body, SendBody};

use crate::endpoint::Endpoints;

/// Upper bound on idle connections kept in the pool across all hosts.
///
/// ureq has no cap on open connections; this only limits how many idle
/// ones are kept for reuse.
pub const MAX_CONNECTIONS: usize = 100;

/// Upper bound on idle connections kept in the pool for a single host.
pub const MAX_CONNECTIONS_PER_ROUTE: usize = 20;

/// Per-task transport settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub endpoints: Endpoints,
    /// Log request and status lines.
    pub log_http: bool,
    /// Echo configuration details, including the client id.
    pub verbose: bool,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            log_http: false,
            verbose: false,
            user_agent: default_user_agent(),
        }
    }
}

/// `agcp/<version>`.
pub fn default_user_agent() -> String {
    format!("agcp/{}", env!("CARGO_PKG_VERSION"))
}

/// Build a pooled agent for one task execution.
///
/// Non-2xx statuses are returned as responses, not errors, so callers can
/// report the status line themselves. No timeouts are set beyond ureq's defaults.
pub fn build_agent(settings: &HttpSettings) -> Agent {
    let builder = ureq::config::Config::builder()
        .http_status_as_error(false)
        .user_agent(settings.user_agent.as_str())
        .max_idle_connections(MAX_CONNECTIONS)
        .max_idle_connections_per_host(MAX_CONNECTIONS_PER_ROUTE);

    let config = if settings.log_http {
        builder.middleware(LineLogger).build()
    } else {
        builder.build()
    };
    Agent::new_with_config(config)
}

/// Logs the request line and the response status line. Headers and bodies
/// are never logged.
struct LineLogger;

impl Middleware for LineLogger {
    fn handle(
        &self,
        request: Request<SendBody>,
        next: MiddlewareNext,
    ) -> Result<Response<Body>, ureq::Error> {
        log::info!("> {} {}", request.method(), strip_query(&request.uri().to_string()));
        let response = next.handle(request)?;
        log::info!("< {:?} {}", response.version(), status_line(response.status()));
        Ok(response)
    }
}

// Upload URLs carry signed credentials in the query string.
fn strip_query(uri: &str) -> &str {
    uri.split_once('?').map_or(uri, |(path, _)| path)
}

/// `"401 Unauthorized"` style status line.
pub fn status_line(status: StatusCode) -> String {
    format!("{} {}", status.as_u16(), reason_phrase(status))
}

/// The canonical reason phrase for a status, or an empty string.
pub fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrases() {
        assert_eq!(reason_phrase(StatusCode::UNAUTHORIZED), "Unauthorized");
        assert_eq!(status_line(StatusCode::FORBIDDEN), "403 Forbidden");
    }

    #[test]
    fn query_is_not_logged() {
        assert_eq!(
            strip_query("https://obs.example.com/object?X-Amz-Signature=abc"),
            "https://obs.example.com/object"
        );
        assert_eq!(strip_query("/oauth2/v1/token"), "/oauth2/v1/token");
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(default_user_agent().starts_with("agcp/"));
    }
}
