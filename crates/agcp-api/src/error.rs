//! Error types for agcp-api.

/// Errors produced while obtaining an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credentials file is missing or unreadable.
    #[error("API credentials not found at {path} — create an API client with the `App administrator` role and save its JSON there")]
    MissingCredentials { path: String },

    /// The credentials file is not a team client credential, or lacks id/secret.
    #[error("API credentials of type \"{kind}\" cannot be used — a `team_client_id` client with id and secret is required")]
    UnsupportedCredentials { kind: String },

    /// The token request could not be sent or its response not received.
    #[error("token request failed: {message}")]
    Transport { message: String },

    /// The token endpoint answered with a non-200 status.
    #[error("token request failed with HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The token endpoint answered 200 with a body that is not a token.
    #[error("cannot parse token response: {message}")]
    MalformedResponse { message: String },
}

/// Errors produced by publishing API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or its response not received.
    #[error("request failed: {message}")]
    Transport { message: String },

    /// The endpoint answered with a non-200 status.
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The endpoint answered 200 but reported a vendor error code.
    #[error("request rejected with code {code}: {message}")]
    Rejected { code: i64, message: String },

    /// The response body does not have the expected shape.
    #[error("cannot parse response: {message}")]
    MalformedResponse { message: String },

    /// No application is registered for the package name.
    #[error("no app id registered for package {package_name}")]
    UnknownPackage { package_name: String },

    /// The artifact to upload cannot be read.
    #[error("cannot read artifact {path}: {source}")]
    Artifact {
        path: String,
        source: agcp_util::error::UtilError,
    },
}
