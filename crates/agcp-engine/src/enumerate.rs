//! Expand build types × product flavors × artifact types into publishable units.

use std::path::PathBuf;

use agcp_config::ConfigResolver;
use agcp_variants::{compute_variant_name, ArtifactType, BuildVariant};

/// The `agcPublishing` extension, resolved once before enumeration.
///
/// Every unit gets a copy; nothing is updated while iterating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishingSettings {
    /// Credentials file after override/fallback resolution.
    pub api_config_path: PathBuf,
    pub log_http: bool,
    pub verbose: bool,
}

/// One variant together with the configuration its tasks run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishableUnit {
    pub variant: BuildVariant,
    pub app_config_path: PathBuf,
    pub api_config_path: PathBuf,
    pub log_http: bool,
    pub verbose: bool,
}

pub struct VariantEnumerator {
    resolver: ConfigResolver,
    settings: PublishingSettings,
}

impl VariantEnumerator {
    pub fn new(resolver: ConfigResolver, settings: PublishingSettings) -> Self {
        Self { resolver, settings }
    }

    /// All combinations before the app-config filter, in planning order:
    /// flavors outer, build types inner, artifact types innermost.
    ///
    /// Yields `|buildTypes| × max(1, |productFlavors|) × 2` variants.
    pub fn candidates(build_types: &[String], product_flavors: &[String]) -> Vec<BuildVariant> {
        let flavors: Vec<Option<&str>> = if product_flavors.is_empty() {
            vec![None]
        } else {
            product_flavors.iter().map(|f| Some(f.as_str())).collect()
        };

        let mut variants =
            Vec::with_capacity(flavors.len() * build_types.len() * ArtifactType::ALL.len());
        for flavor in &flavors {
            for build_type in build_types {
                for artifact_type in ArtifactType::ALL {
                    variants.push(BuildVariant::new(build_type, *flavor, artifact_type));
                }
            }
        }
        variants
    }

    /// Units for every candidate that has an app metadata file on disk.
    ///
    /// `build_types` must already be restricted to completely signed ones.
    /// Candidates without an `agconnect-services.json` are skipped with an
    /// info log; that is never an error.
    pub fn enumerate(&self, build_types: &[String], product_flavors: &[String]) -> Vec<PublishableUnit> {
        Self::candidates(build_types, product_flavors)
            .into_iter()
            .filter_map(|variant| {
                let lookup = variant
                    .product_flavor
                    .as_deref()
                    .map(|flavor| compute_variant_name(Some(flavor), &variant.build_type));
                let Some(app_config_path) = self
                    .resolver
                    .resolve_app_config_path(&variant.build_type, lookup.as_deref())
                else {
                    log::info!("{variant} skipped: no agconnect-services.json");
                    return None;
                };
                if self.settings.verbose {
                    log::debug!("{variant}: {}", app_config_path.display());
                }
                Some(PublishableUnit {
                    variant,
                    app_config_path,
                    api_config_path: self.settings.api_config_path.clone(),
                    log_http: self.settings.log_http,
                    verbose: self.settings.verbose,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use agcp_config::services::APP_CONFIG_FILE;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn enumerator(root: &Path) -> VariantEnumerator {
        let module = root.join("mobile");
        VariantEnumerator::new(
            ConfigResolver::new(root, &module),
            PublishingSettings {
                api_config_path: root.join("credentials/agc-apiclient.json"),
                log_http: true,
                verbose: false,
            },
        )
    }

    fn app_config(root: &Path, source_set: &str) {
        let dir = root.join("mobile/src").join(source_set);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(APP_CONFIG_FILE), b"{}").unwrap();
    }

    #[test]
    fn candidates_without_flavors() {
        let variants = VariantEnumerator::candidates(&names(&["debug", "release"]), &[]);
        assert_eq!(variants.len(), 4);
        assert_eq!(
            variants.first(),
            Some(&BuildVariant::new("debug", None, ArtifactType::Apk))
        );
        assert_eq!(
            variants.get(1),
            Some(&BuildVariant::new("debug", None, ArtifactType::Aab))
        );
    }

    #[test]
    fn candidates_flavor_outer_loop() {
        let variants =
            VariantEnumerator::candidates(&names(&["debug", "release"]), &names(&["google", "huawei"]));
        assert_eq!(variants.len(), 8);
        let order: Vec<String> = variants.iter().map(BuildVariant::name).collect();
        assert_eq!(
            order,
            names(&[
                "googleDebug",
                "googleDebug",
                "googleRelease",
                "googleRelease",
                "huaweiDebug",
                "huaweiDebug",
                "huaweiRelease",
                "huaweiRelease",
            ])
        );
    }

    #[test]
    fn enumerate_skips_missing_app_config() {
        let tmp = tempfile::tempdir().unwrap();
        app_config(tmp.path(), "release");
        let units = enumerator(tmp.path()).enumerate(&names(&["debug", "release"]), &[]);
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| u.variant.build_type == "release"));
    }

    #[test]
    fn enumerate_keeps_debug_bundle_unit() {
        // The debug-AAB rule only suppresses the publish task, not the unit.
        let tmp = tempfile::tempdir().unwrap();
        app_config(tmp.path(), "debug");
        let units = enumerator(tmp.path()).enumerate(&names(&["debug"]), &[]);
        assert_eq!(units.len(), 2);
        assert!(units
            .iter()
            .any(|u| u.variant.artifact_type == ArtifactType::Aab));
    }

    #[test]
    fn enumerate_flavored_uses_variant_dir() {
        let tmp = tempfile::tempdir().unwrap();
        app_config(tmp.path(), "huaweiRelease");
        let units = enumerator(tmp.path())
            .enumerate(&names(&["debug", "release"]), &names(&["huawei"]));
        assert_eq!(units.len(), 2);
        let unit = units.first().unwrap();
        assert_eq!(unit.variant.name(), "huaweiRelease");
        assert!(unit.app_config_path.ends_with("src/huaweiRelease/agconnect-services.json"));
    }

    #[test]
    fn units_carry_settings_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        app_config(tmp.path(), "release");
        let units = enumerator(tmp.path()).enumerate(&names(&["release"]), &[]);
        for unit in &units {
            assert!(unit.log_http);
            assert!(!unit.verbose);
            assert!(unit.api_config_path.ends_with("credentials/agc-apiclient.json"));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn candidate_count(
                build_types in proptest::collection::vec("[a-z]{1,8}", 0..5),
                flavors in proptest::collection::vec("[a-z]{1,8}", 0..4),
            ) {
                let variants = VariantEnumerator::candidates(&build_types, &flavors);
                prop_assert_eq!(
                    variants.len(),
                    build_types.len() * flavors.len().max(1) * 2
                );
            }
        }
    }
}
