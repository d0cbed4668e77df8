//! The per-variant app metadata file (`agconnect-services.json`).

use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::error::ConfigError;

/// File name searched for in the module's source sets.
pub const APP_CONFIG_FILE: &str = "agconnect-services.json";

/// Identifies the remote application record that operations target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub app_id: i64,
    pub package_name: String,
    pub project_id: i64,
}

#[derive(Debug, Deserialize)]
struct AppConfigFile {
    client: ClientSection,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    #[serde(deserialize_with = "int_or_string")]
    app_id: i64,
    package_name: String,
    #[serde(default, deserialize_with = "int_or_string")]
    project_id: i64,
}

/// The console writes numeric ids as JSON strings; accept both spellings.
fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => Ok(v),
        IntOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl AppIdentity {
    /// Read the `client` section of an app metadata file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or lacks `client.app_id` /
    /// `client.package_name`.
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

    /// Parse the identity from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON lacks the required `client` fields.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let file: AppConfigFile = serde_json::from_str(content)?;
        Ok(Self {
            app_id: file.client.app_id,
            package_name: file.client.package_name,
            project_id: file.client.project_id,
        })
    }
}
