//! The API client credentials file (`agc-apiclient.json`).

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Credential type issued for team-level API clients. Only this type carries a
/// usable client id/secret pair.
pub const TEAM_CLIENT_ID: &str = "team_client_id";

/// Raw contents of the API credentials file.
#[derive(Clone, Deserialize)]
pub struct ApiCredentials {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

// The secret stays out of `{:?}` output.
impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// A client id/secret pair accepted by the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ApiCredentials {
    /// Read and parse a credentials file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content).map_err(|e| ConfigError::Json {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Parse credentials from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not a JSON object of the expected shape.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// The id/secret pair, if this is a team client credential with both values set.
    pub fn client_credentials(&self) -> Option<ClientCredentials> {
        if self.kind != TEAM_CLIENT_ID {
            return None;
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return None;
        }
        Some(ClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        })
    }
}
