//! Locate the app metadata and API credentials files on disk.

use std::path::{Path, PathBuf};

use crate::services::APP_CONFIG_FILE;

/// Default credentials location, relative to the root project directory.
pub const DEFAULT_API_CONFIG: [&str; 2] = ["credentials", "agc-apiclient.json"];

/// Stateless path resolution against a root project and one module.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    root_dir: PathBuf,
    module_dir: PathBuf,
}

impl ConfigResolver {
    pub fn new(root_dir: &Path, module_dir: &Path) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            module_dir: module_dir.to_path_buf(),
        }
    }

    /// Find the `agconnect-services.json` for a build type and optional variant.
    ///
    /// Search order:
    /// 1. `src/<buildType>/agconnect-services.json`
    /// 2. `src/<variant>/agconnect-services.json` when a variant is given,
    ///    otherwise the flavor-less `src/agconnect-services.json`
    ///
    /// Returns `None` when neither exists; callers skip the combination.
    pub fn resolve_app_config_path(&self, build_type: &str, variant: Option<&str>) -> Option<PathBuf> {
        let src = self.module_dir.join("src");
        let fallback = match variant {
            Some(variant) => src.join(variant).join(APP_CONFIG_FILE),
            None => src.join(APP_CONFIG_FILE),
        };
        [src.join(build_type).join(APP_CONFIG_FILE), fallback]
            .into_iter()
            .find(|candidate| is_readable(candidate))
    }

    /// The default credentials path, `<root>/credentials/agc-apiclient.json`.
    pub fn default_api_config_path(&self) -> PathBuf {
        DEFAULT_API_CONFIG
            .iter()
            .fold(self.root_dir.clone(), |path, part| path.join(part))
    }

    /// Resolve the credentials path, honoring a non-empty override.
    ///
    /// A relative override is taken relative to the root project. An override
    /// that does not exist falls back to the default with a warning.
    pub fn resolve_api_config_path(&self, config_override: &str) -> PathBuf {
        let default = self.default_api_config_path();
        if config_override.is_empty() {
            return default;
        }
        let candidate = self.root_dir.join(config_override);
        if candidate.exists() {
            candidate
        } else {
            log::warn!("AGConnect API config not found: {}", candidate.display());
            log::warn!("Reverting to the default value: {}", default.display());
            default
        }
    }
}

fn is_readable(path: &Path) -> bool {
    path.is_file() && std::fs::File::open(path).is_ok()
}
