//! Locate the APK or AAB a publish task uploads.

use std::path::{Path, PathBuf};

use agcp_util::fs::files_with_extension;
use agcp_variants::{ArtifactType, BuildVariant};

use crate::error::EngineError;

/// Directory the host writes a variant's artifact to.
///
/// APKs go to `build/outputs/apk/[<flavor>/]<buildType>/`, bundles to
/// `build/outputs/bundle/<variant>/`.
pub fn output_dir(module_dir: &Path, variant: &BuildVariant) -> PathBuf {
    let outputs = module_dir.join("build").join("outputs");
    match variant.artifact_type {
        ArtifactType::Apk => {
            let apk = outputs.join("apk");
            match &variant.product_flavor {
                Some(flavor) => apk.join(flavor).join(&variant.build_type),
                None => apk.join(&variant.build_type),
            }
        }
        ArtifactType::Aab => outputs.join("bundle").join(variant.name()),
    }
}

/// The first artifact in the variant's output directory, by file name.
///
/// # Errors
/// Returns `EngineError::ArtifactNotFound` if the directory holds no artifact
/// of the variant's type.
pub fn locate_artifact(
    module_dir: &Path,
    task: &str,
    dependency: &str,
    variant: &BuildVariant,
) -> Result<PathBuf, EngineError> {
    let dir = output_dir(module_dir, variant);
    let suffix = variant.artifact_type.suffix();
    let files = files_with_extension(&dir, suffix)?;
    if files.len() > 1 {
        log::warn!(
            "{} .{suffix} files in {}, uploading the first",
            files.len(),
            dir.display()
        );
    }
    files
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::ArtifactNotFound {
            task: task.to_owned(),
            dir: dir.display().to_string(),
            suffix: suffix.to_owned(),
            dependency: dependency.to_owned(),
        })
}
