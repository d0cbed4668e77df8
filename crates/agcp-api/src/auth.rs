//! OAuth2 client-credentials exchange against the token endpoint.

use std::time::{Duration, SystemTime};

use ureq::http::StatusCode;
use ureq::Agent;

use agcp_config::ApiCredentials;

use crate::error::AuthError;
use crate::model::{TokenRequest, TokenResponse};
use crate::transport::{build_agent, reason_phrase, HttpSettings};

/// A bearer token, bound to the client id that obtained it.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    client_id: String,
    obtained_at: SystemTime,
    expires_in: Option<Duration>,
}

impl AccessToken {
    pub fn new(value: &str, client_id: &str) -> Self {
        Self {
            value: value.to_owned(),
            client_id: client_id.to_owned(),
            obtained_at: SystemTime::now(),
            expires_in: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn obtained_at(&self) -> SystemTime {
        self.obtained_at
    }

    /// Lifetime announced by the token endpoint, if any.
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("client_id", &self.client_id)
            .field("obtained_at", &self.obtained_at)
            .finish_non_exhaustive()
    }
}

/// Owns the pooled transport of one task execution and authenticates on it.
///
/// The agent is not shared across tasks; every task builds its own client
/// and fetches a fresh token.
pub struct AuthClient {
    agent: Agent,
    settings: HttpSettings,
}

impl AuthClient {
    pub fn new(settings: HttpSettings) -> Self {
        Self {
            agent: build_agent(&settings),
            settings,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Exchange client credentials for an access token.
    ///
    /// # Errors
    /// Returns `AuthError::UnsupportedCredentials` if the credentials are not a
    /// complete team client credential, `AuthError::Status` on a non-200 answer,
    /// and `AuthError::MalformedResponse` if the body carries no token.
    pub fn authenticate(&self, credentials: &ApiCredentials) -> Result<AccessToken, AuthError> {
        let client = credentials
            .client_credentials()
            .ok_or_else(|| AuthError::UnsupportedCredentials {
                kind: credentials.kind.clone(),
            })?;

        if self.settings.verbose {
            log::debug!("ClientId: {}", client.client_id);
        }

        let payload = serde_json::to_string(&TokenRequest {
            grant_type: "client_credentials",
            client_id: &client.client_id,
            client_secret: &client.client_secret,
        })
        .map_err(|e| AuthError::Transport {
            message: e.to_string(),
        })?;

        let mut response = self
            .agent
            .post(self.settings.endpoints.token())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(payload)
            .map_err(|e| AuthError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Status {
                status: status.as_u16(),
                reason: reason_phrase(status),
            });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AuthError::MalformedResponse {
                message: e.to_string(),
            })?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::MalformedResponse {
                message: e.to_string(),
            })?;
        if token.access_token.is_empty() {
            return Err(AuthError::MalformedResponse {
                message: "empty access_token".to_owned(),
            });
        }

        Ok(AccessToken {
            value: token.access_token,
            client_id: client.client_id,
            obtained_at: SystemTime::now(),
            expires_in: token.expires_in.map(Duration::from_secs),
        })
    }
}
