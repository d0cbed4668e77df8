//! Load `agcp.toml` and plan the project's tasks.

use std::path::{Path, PathBuf};

use agcp_api::{Endpoints, ReleaseType};
use agcp_config::manifest::MANIFEST_FILE;
use agcp_config::{ConfigResolver, Manifest};
use agcp_util::text::to_csv;

use crate::enumerate::{PublishingSettings, VariantEnumerator};
use crate::error::EngineError;
use crate::plan::{TaskGraph, TaskPlanner};

/// A configured project and its planned tasks.
#[derive(Debug)]
pub struct Project {
    pub root_dir: PathBuf,
    pub module_dir: PathBuf,
    pub manifest: Manifest,
    pub settings: PublishingSettings,
    pub graph: TaskGraph,
}

impl Project {
    /// Read `agcp.toml` under `root_dir` and plan every task.
    ///
    /// Configuration gaps (unsigned build types, variants without app
    /// metadata, a missing credentials override) are logged and skipped.
    ///
    /// # Errors
    /// Returns an error if `agcp.toml` cannot be read or parsed.
    pub fn load(root_dir: &Path) -> Result<Self, EngineError> {
        let manifest = Manifest::from_path(&root_dir.join(MANIFEST_FILE))?;
        let module_dir = manifest.module_dir(root_dir);
        let resolver = ConfigResolver::new(root_dir, &module_dir);

        let settings = PublishingSettings {
            api_config_path: resolver.resolve_api_config_path(&manifest.publishing.config_file),
            log_http: manifest.publishing.log_http,
            verbose: manifest.publishing.verbose,
        };
        if settings.verbose {
            log::info!("API config: {}", settings.api_config_path.display());
        }

        let flavors = manifest.product_flavor_names();
        if flavors.is_empty() {
            log::info!("No product flavors were detected.");
        } else {
            log::info!(
                "{} product flavors were detected: {}",
                flavors.len(),
                to_csv(&flavors)
            );
        }

        let build_types = manifest.signed_build_types(&module_dir);
        let units = VariantEnumerator::new(resolver, settings.clone()).enumerate(&build_types, &flavors);
        let graph = TaskPlanner::new(&manifest.project.name).plan_graph(&units);
        log::debug!("{} tasks planned from {} units", graph.len(), units.len());

        Ok(Self {
            root_dir: root_dir.to_path_buf(),
            module_dir,
            manifest,
            settings,
            graph,
        })
    }

    /// The configured release type.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidReleaseType` for codes other than 1 and 3.
    pub fn release_type(&self) -> Result<ReleaseType, EngineError> {
        let code = self.manifest.publishing.release_type;
        ReleaseType::from_code(code).ok_or(EngineError::InvalidReleaseType { code })
    }

    /// API endpoints, honoring a `project.api_url` override.
    pub fn endpoints(&self) -> Endpoints {
        self.manifest
            .project
            .api_url
            .as_deref()
            .map_or_else(Endpoints::default, Endpoints::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    const MANIFEST: &str = r#"
[project]
name = "mobile"

[signing_configs.debug]
store_file = "debug.keystore"
store_password = "android"
key_alias = "androiddebugkey"
key_password = "android"

[signing_configs.release]
store_file = "upload.keystore"
store_password = "secret"
key_alias = "upload"
key_password = "secret"

[build_types.debug]
signing_config = "debug"

[build_types.release]
signing_config = "release"
"#;

    fn scaffold(manifest: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join(MANIFEST_FILE), manifest).unwrap();
        let module = root.join("mobile");
        fs::create_dir_all(module.join("src")).unwrap();
        fs::write(module.join("debug.keystore"), b"ks").unwrap();
        fs::write(module.join("upload.keystore"), b"ks").unwrap();
        tmp
    }

    fn app_config(root: &Path, source_set: &str) {
        let dir = root.join("mobile/src").join(source_set);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("agconnect-services.json"),
            r#"{"client": {"app_id": "42", "package_name": "io.syslogic.audio"}}"#,
        )
        .unwrap();
    }

    #[test]
    fn flavorless_project_plans_six_tasks() {
        let tmp = scaffold(MANIFEST);
        app_config(tmp.path(), "debug");
        app_config(tmp.path(), "release");

        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(
            project.graph.names(),
            vec![
                "getAppIdDebug",
                "getAppIdRelease",
                "getAppInfoDebug",
                "getAppInfoRelease",
                "publishAab",
                "publishApk",
            ]
        );
        assert_eq!(
            project.settings.api_config_path,
            tmp.path().join("credentials/agc-apiclient.json")
        );
    }

    #[test]
    fn unsigned_build_type_plans_nothing() {
        let manifest = MANIFEST.replace("key_password = \"secret\"", "key_password = \"\"");
        let tmp = scaffold(&manifest);
        app_config(tmp.path(), "release");

        let project = Project::load(tmp.path()).unwrap();
        assert!(project.graph.is_empty());
    }

    #[test]
    fn flavored_project_uses_flavor_task_names() {
        let manifest = format!("{MANIFEST}\n[product_flavors.huawei]\ndimension = \"vendor\"\n");
        let tmp = scaffold(&manifest);
        app_config(tmp.path(), "huaweiRelease");

        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(
            project.graph.names(),
            vec![
                "getAppIdRelease",
                "getAppInfoRelease",
                "publishHuaweiReleaseAab",
                "publishHuaweiReleaseApk",
            ]
        );
    }

    #[test]
    fn missing_manifest_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Project::load(tmp.path()),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn release_type_and_endpoint_overrides() {
        let manifest = MANIFEST.replace(
            "name = \"mobile\"",
            "name = \"mobile\"\napi_url = \"http://127.0.0.1:8080/api/\"",
        ) + "\n[publishing]\nrelease_type = 3\n";
        let tmp = scaffold(&manifest);

        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(project.release_type().unwrap(), ReleaseType::Phased);
        assert_eq!(project.endpoints().base_url(), "http://127.0.0.1:8080/api");
    }

    #[test]
    fn invalid_release_type_is_error() {
        let tmp = scaffold(&format!("{MANIFEST}\n[publishing]\nrelease_type = 2\n"));
        let project = Project::load(tmp.path()).unwrap();
        assert!(matches!(
            project.release_type(),
            Err(EngineError::InvalidReleaseType { code: 2 })
        ));
    }
}
