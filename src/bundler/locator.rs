//! Artifact discovery in the native build's output directories.
//!
//! The native build writes to a fixed layout under its outputs root:
//!
//! ```text
//! outputs/apk/{debug|release}/*.apk
//! outputs/bundle/{debug|release}/*.aab
//! ```
//!
//! An installable package always wins over a bundle, since it never needs
//! conversion. More than one match in a directory is an error: the pipeline
//! does not guess which file a build produced.

use std::path::{Path, PathBuf};

use super::{
    artifact::{ArtifactKind, ArtifactRef, BuildVariant},
    error::{Error, ErrorExt, Result},
};

/// Directory the native build writes `kind` artifacts of `variant` to.
pub fn output_dir(build_root: &Path, kind: ArtifactKind, variant: BuildVariant) -> PathBuf {
    build_root
        .join(kind.output_segment())
        .join(variant.dir_name())
}

/// Directory the pipeline writes signed artifacts of `variant` to.
pub fn signed_dir(build_root: &Path, variant: BuildVariant) -> PathBuf {
    build_root.join("signed").join(variant.dir_name())
}

/// Finds the single artifact produced for `variant` under `build_root`.
pub async fn locate(build_root: &Path, variant: BuildVariant) -> Result<ArtifactRef> {
    let mut searched = Vec::new();

    for kind in [
        ArtifactKind::InstallablePackage,
        ArtifactKind::DistributableBundle,
    ] {
        let dir = output_dir(build_root, kind, variant);
        log::debug!("Scanning for {} in: {}", kind, dir.display());

        let mut matches = scan(&dir, kind.extension()).await?;
        searched.push(dir.clone());

        match matches.len() {
            0 => continue,
            1 => {
                let path = matches.remove(0);
                log::info!("Found {}: {}", kind, path.display());
                return Ok(ArtifactRef::new(path, kind, variant));
            }
            _ => {
                matches.sort();
                return Err(Error::AmbiguousArtifact {
                    directory: dir,
                    candidates: matches,
                });
            }
        }
    }

    Err(Error::ArtifactNotFound { searched })
}

/// Regular files in `dir` whose extension is `extension` (case-insensitive).
/// A missing directory yields no files.
async fn scan(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).fs_context("reading output directory", dir),
    };

    let mut found = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading output directory entry", dir)?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .fs_context("reading file type", &path)?;
        if !file_type.is_file() {
            log::debug!("  Skipping non-regular file: {}", path.display());
            continue;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            found.push(path);
        } else {
            log::debug!("  Skipping non-artifact: {}", path.display());
        }
    }
    Ok(found)
}
