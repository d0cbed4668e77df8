//! Build variants and artifact types for Android publishing.

use std::fmt;
use std::str::FromStr;

use agcp_util::text::capitalize;

/// The build type whose bundles are signed with the debug key.
pub const DEBUG_BUILD_TYPE: &str = "debug";

/// A distributable Android artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactType {
    /// Application package, produced by `assemble<Variant>`.
    Apk,
    /// Android App Bundle, produced by `bundle<Variant>`.
    Aab,
}

impl ArtifactType {
    /// Both artifact types, in the order tasks are planned.
    pub const ALL: [ArtifactType; 2] = [ArtifactType::Apk, ArtifactType::Aab];

    /// File suffix, also used as the upload `suffix` parameter.
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactType::Apk => "apk",
            ArtifactType::Aab => "aab",
        }
    }

    /// Name of the host task family that produces this artifact.
    pub fn host_task_prefix(self) -> &'static str {
        match self {
            ArtifactType::Apk => "assemble",
            ArtifactType::Aab => "bundle",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for ArtifactType {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apk" => Ok(ArtifactType::Apk),
            "aab" => Ok(ArtifactType::Aab),
            _ => Err(VariantError::UnknownArtifactType {
                value: s.to_owned(),
            }),
        }
    }
}

/// Compute the host's variant name for a flavor/build-type pair.
///
/// Without a flavor the variant name is the build type itself; with one it is
/// `flavor + Capitalize(buildType)`, e.g. `huaweiDebug`.
pub fn compute_variant_name(product_flavor: Option<&str>, build_type: &str) -> String {
    match product_flavor {
        Some(flavor) => format!("{flavor}{}", capitalize(build_type)),
        None => build_type.to_owned(),
    }
}

/// One publishable build-type × flavor × artifact combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildVariant {
    pub build_type: String,
    pub product_flavor: Option<String>,
    pub artifact_type: ArtifactType,
}

impl BuildVariant {
    pub fn new(build_type: &str, product_flavor: Option<&str>, artifact_type: ArtifactType) -> Self {
        Self {
            build_type: build_type.to_owned(),
            product_flavor: product_flavor.map(str::to_owned),
            artifact_type,
        }
    }

    /// The host variant name (`release`, `huaweiRelease`).
    pub fn name(&self) -> String {
        compute_variant_name(self.product_flavor.as_deref(), &self.build_type)
    }

    /// Whether a publish operation may be planned for this variant.
    ///
    /// Debug bundles are signed with the debug key, which the vendor's publish
    /// endpoint rejects, so `debug` × AAB is never published.
    pub fn is_publishable(&self) -> bool {
        !(self.artifact_type == ArtifactType::Aab && self.build_type == DEBUG_BUILD_TYPE)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.artifact_type)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("unknown artifact type \"{value}\" — expected `apk` or `aab`")]
    UnknownArtifactType { value: String },
}
