use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name of the project descriptor at the root project directory.
pub const MANIFEST_FILE: &str = "agcp.toml";

/// The `agcp.toml` project descriptor.
///
/// Mirrors the parts of the Android build script the publisher needs: signing
/// configs, build types, product flavors, and the `agcPublishing` extension.
/// Maps are keyed by name, so iteration follows the host's name-ordered containers.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub project: Project,
    #[serde(default)]
    pub publishing: PublishingExtension,
    #[serde(default)]
    pub signing_configs: BTreeMap<String, SigningConfig>,
    #[serde(default)]
    pub build_types: BTreeMap<String, BuildType>,
    #[serde(default)]
    pub product_flavors: BTreeMap<String, ProductFlavor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Host project name, as in `:mobile:assembleRelease`.
    pub name: String,
    /// Module directory relative to the root project. Defaults to `name`.
    #[serde(default)]
    pub path: Option<String>,
    /// Override for the vendor API base URL.
    #[serde(default)]
    pub api_url: Option<String>,
}

/// The `agcPublishing` extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishingExtension {
    /// Path of the API credentials file; empty means the default location.
    #[serde(default)]
    pub config_file: String,
    #[serde(default)]
    pub log_http: bool,
    #[serde(default)]
    pub verbose: bool,
    /// Vendor release type: `1` full network release, `3` phased release.
    #[serde(default = "default_release_type")]
    pub release_type: u8,
}

impl Default for PublishingExtension {
    fn default() -> Self {
        Self {
            config_file: String::new(),
            log_http: false,
            verbose: false,
            release_type: default_release_type(),
        }
    }
}

fn default_release_type() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigningConfig {
    /// Keystore path, relative to the module directory.
    #[serde(default)]
    pub store_file: Option<String>,
    #[serde(default)]
    pub store_password: Option<String>,
    #[serde(default)]
    pub key_alias: Option<String>,
    #[serde(default)]
    pub key_password: Option<String>,
}

impl SigningConfig {
    /// A signing config is complete when the keystore exists and every secret is non-empty.
    pub fn is_complete(&self, module_dir: &Path) -> bool {
        let Some(store_file) = self.store_file.as_deref() else {
            return false;
        };
        module_dir.join(store_file).is_file()
            && non_empty(self.store_password.as_deref())
            && non_empty(self.key_alias.as_deref())
            && non_empty(self.key_password.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildType {
    /// Name of the entry in `[signing_configs]`.
    #[serde(default)]
    pub signing_config: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFlavor {
    #[serde(default)]
    pub dimension: Option<String>,
}

impl Manifest {
    /// Read and parse an `agcp.toml` from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let manifest: Manifest = toml::from_str(&content).map_err(|e| ConfigError::Manifest {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(manifest)
    }

    /// The module directory for a root project directory.
    pub fn module_dir(&self, root_dir: &Path) -> PathBuf {
        root_dir.join(self.project.path.as_deref().unwrap_or(&self.project.name))
    }

    /// Build types whose signing config is complete, in name order.
    ///
    /// Incompletely signed build types are logged and left out; they never fail
    /// the configuration.
    pub fn signed_build_types(&self, module_dir: &Path) -> Vec<String> {
        let mut signed = Vec::new();
        for (name, build_type) in &self.build_types {
            let signing = build_type
                .signing_config
                .as_deref()
                .and_then(|s| self.signing_configs.get(s));
            match signing {
                Some(config) if config.is_complete(module_dir) => signed.push(name.clone()),
                Some(_) => {
                    log::info!("build type `{name}` skipped: incomplete signing config");
                }
                None => {
                    log::info!("build type `{name}` skipped: no signing config");
                }
            }
        }
        signed
    }

    /// Product flavor names, in name order.
    pub fn product_flavor_names(&self) -> Vec<String> {
        self.product_flavors.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = r#"
[project]
name = "mobile"

[publishing]
log_http = true

[signing_configs.debug]
store_file = "debug.keystore"
store_password = "android"
key_alias = "androiddebugkey"
key_password = "android"

[signing_configs.release]
store_file = "upload.keystore"
store_password = "secret"
key_alias = "upload"
key_password = ""

[build_types.debug]
signing_config = "debug"

[build_types.release]
signing_config = "release"

[build_types.staging]

[product_flavors.huawei]
dimension = "vendor"
"#;

    fn write_manifest(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, content).unwrap_or_else(|e| panic!("{e}"));
        path
    }

    #[test]
    fn parse_sample_manifest() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = write_manifest(tmp.path(), SAMPLE);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(manifest.project.name, "mobile");
        assert!(manifest.publishing.log_http);
        assert!(!manifest.publishing.verbose);
        assert_eq!(manifest.publishing.release_type, 1);
        assert!(manifest.publishing.config_file.is_empty());
        assert_eq!(manifest.product_flavor_names(), vec!["huawei"]);
    }

    #[test]
    fn module_dir_defaults_to_project_name() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = write_manifest(tmp.path(), SAMPLE);
        let mut manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(manifest.module_dir(tmp.path()), tmp.path().join("mobile"));
        manifest.project.path = Some("app".to_owned());
        assert_eq!(manifest.module_dir(tmp.path()), tmp.path().join("app"));
    }

    #[test]
    fn only_completely_signed_build_types() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = write_manifest(tmp.path(), SAMPLE);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let module = manifest.module_dir(tmp.path());
        fs::create_dir_all(&module).unwrap_or_else(|e| panic!("{e}"));
        fs::write(module.join("debug.keystore"), b"ks").unwrap_or_else(|e| panic!("{e}"));
        fs::write(module.join("upload.keystore"), b"ks").unwrap_or_else(|e| panic!("{e}"));

        // release has an empty key password, staging has no signing config.
        assert_eq!(manifest.signed_build_types(&module), vec!["debug"]);
    }

    #[test]
    fn missing_keystore_is_incomplete() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let config = SigningConfig {
            store_file: Some("absent.keystore".to_owned()),
            store_password: Some("a".to_owned()),
            key_alias: Some("b".to_owned()),
            key_password: Some("c".to_owned()),
        };
        assert!(!config.is_complete(tmp.path()));
        assert!(!SigningConfig::default().is_complete(tmp.path()));
    }

    #[test]
    fn invalid_toml_reports_path() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = write_manifest(tmp.path(), "[project\nname=");
        let err = Manifest::from_path(&path)
            .err()
            .unwrap_or_else(|| panic!("expected parse error"))
            .to_string();
        assert!(err.contains("agcp.toml"), "error was: {err}");
    }

    #[test]
    fn missing_project_table_is_an_error() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = write_manifest(tmp.path(), "[publishing]\nverbose = true\n");
        assert!(Manifest::from_path(&path).is_err());
    }
}
