//! Bundle (.aab) to universal installable package (.apk) conversion.
//!
//! The conversion tool writes an APK set (`.apks`, a zip container) holding
//! every device-configuration split. In universal mode the set holds a single
//! `universal.apk` that runs on any device; it is extracted and moved to the
//! requested output path. The tool signs the package with the release
//! identity while building the set.
//!
//! # Process
//!
//! 1. Remove the stale output, container and extraction directory
//! 2. Run the conversion tool, writing the container
//! 3. Extract the container
//! 4. Move `universal.apk` to the output path

use std::path::{Path, PathBuf};

use super::{
    artifact::{ArtifactKind, ArtifactRef},
    credentials::CredentialFiles,
    error::{Error, Result},
    identity::SigningIdentity,
    tools::{ToolCommand, ToolRunner, ToolSpec},
    utils::fs,
};

/// File name of the universal package inside an APK set.
pub const UNIVERSAL_APK: &str = "universal.apk";

/// Extension of the APK set container.
pub const CONTAINER_EXTENSION: &str = "apks";

/// Converts bundles through an external conversion tool.
pub struct BundleConverter<'a> {
    runner: &'a dyn ToolRunner,
    bundletool: &'a ToolSpec,
}

impl<'a> BundleConverter<'a> {
    /// Converter invoking `bundletool` through `runner`.
    pub fn new(runner: &'a dyn ToolRunner, bundletool: &'a ToolSpec) -> Self {
        Self { runner, bundletool }
    }

    /// Container path used when converting into `output`.
    pub fn container_path(output: &Path) -> PathBuf {
        output.with_extension(CONTAINER_EXTENSION)
    }

    /// Extraction directory used when converting into `output`.
    pub fn extract_dir(output: &Path) -> PathBuf {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        output.with_file_name(format!("{}_{}", stem, CONTAINER_EXTENSION))
    }

    /// Converts `bundle` into a single universal package at `output`.
    pub async fn convert(
        &self,
        bundle: &ArtifactRef,
        output: &Path,
        identity: &SigningIdentity,
    ) -> Result<ArtifactRef> {
        if bundle.kind() != ArtifactKind::DistributableBundle {
            return Err(Error::ConversionFailed {
                step: "validating input",
                reason: format!("{} is not a distributable bundle", bundle.path().display()),
            });
        }

        let container = Self::container_path(output);
        let extract_dir = Self::extract_dir(output);

        // 1. Clear debris from previous runs
        for stale in [output, container.as_path()] {
            fs::remove_file(stale)
                .await
                .map_err(|e| conversion_failed("removing stale artifacts", e))?;
        }
        fs::remove_dir_all(&extract_dir)
            .await
            .map_err(|e| conversion_failed("removing stale artifacts", e))?;
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent, false)
                .await
                .map_err(|e| conversion_failed("creating output directory", e))?;
        }

        // 2. Build the APK set
        log::info!("Converting {} to universal APK set", bundle.path().display());
        let credentials = CredentialFiles::write(identity)?;
        let command = ToolCommand::new(self.bundletool)
            .arg("build-apks")
            .arg(format!("--bundle={}", bundle.path().display()))
            .arg(format!("--output={}", container.display()))
            .arg("--mode=universal")
            .arg("--overwrite")
            .arg(format!("--ks={}", identity.keystore_path().display()))
            .arg(format!("--ks-key-alias={}", identity.alias()))
            .arg(format!(
                "--ks-pass=file:{}",
                credentials.keystore_password().display()
            ))
            .arg(format!(
                "--key-pass=file:{}",
                credentials.alias_password().display()
            ));

        let result = self.runner.run(&command).await?;
        drop(credentials);
        if !result.is_success() {
            return Err(Error::ConversionFailed {
                step: "building APK set",
                reason: result.failure(&command).to_string(),
            });
        }
        if !tokio::fs::try_exists(&container).await.unwrap_or(false) {
            return Err(Error::ConversionFailed {
                step: "building APK set",
                reason: format!("tool succeeded but {} was not written", container.display()),
            });
        }

        // 3. Extract the container
        extract_archive(&container, &extract_dir).await?;

        // 4. Move the universal package into place
        let universal = find_universal(&extract_dir).await?;
        fs::move_file(&universal, output)
            .await
            .map_err(|e| conversion_failed("moving universal package", e))?;

        log::info!("✓ Universal APK written to {}", output.display());
        Ok(ArtifactRef::new(
            output,
            ArtifactKind::InstallablePackage,
            bundle.variant(),
        ))
    }
}

fn conversion_failed(step: &'static str, error: impl std::fmt::Display) -> Error {
    Error::ConversionFailed {
        step,
        reason: error.to_string(),
    }
}

async fn extract_archive(container: &Path, extract_dir: &Path) -> Result<()> {
    let container = container.to_path_buf();
    let extract_dir = extract_dir.to_path_buf();

    tokio::task::spawn_blocking(move || -> std::result::Result<(), String> {
        std::fs::create_dir_all(&extract_dir).map_err(|e| e.to_string())?;
        let file = std::fs::File::open(&container)
            .map_err(|e| format!("{}: {}", container.display(), e))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| format!("{}: {}", container.display(), e))?;
        archive.extract(&extract_dir).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| conversion_failed("extracting APK set", format!("task panicked: {}", e)))?
    .map_err(|e| conversion_failed("extracting APK set", e))
}

async fn find_universal(extract_dir: &Path) -> Result<PathBuf> {
    let root = extract_dir.to_path_buf();
    let mut found = tokio::task::spawn_blocking(move || {
        walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == UNIVERSAL_APK)
            .map(|e| e.into_path())
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| conversion_failed("locating universal package", format!("task panicked: {}", e)))?;

    match found.len() {
        0 => Err(Error::UniversalArtifactMissing {
            extract_dir: extract_dir.to_path_buf(),
        }),
        1 => Ok(found.remove(0)),
        n => Err(Error::ConversionFailed {
            step: "locating universal package",
            reason: format!("{} copies of {} in {}", n, UNIVERSAL_APK, extract_dir.display()),
        }),
    }
}
