//! File system utilities for artifact handling.
//!
//! Removal helpers are idempotent: a missing target is success.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Moves a file, replacing any existing destination.
///
/// Falls back to copy-and-delete when a rename is not possible (e.g. the
/// destination is on another file system).
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    remove_file(to).await?;

    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    log::debug!(
        "rename {} -> {} failed, copying instead",
        from.display(),
        to.display()
    );
    fs::copy(from, to).await.fs_context("copying file", from)?;
    remove_file(from).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        remove_file(&missing).await.unwrap();
        remove_dir_all(&missing).await.unwrap();
    }

    #[tokio::test]
    async fn move_file_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a/universal.apk");
        let to = dir.path().join("b/app-release.apk");
        std::fs::create_dir_all(from.parent().unwrap()).unwrap();
        std::fs::create_dir_all(to.parent().unwrap()).unwrap();
        std::fs::write(&from, b"new").unwrap();
        std::fs::write(&to, b"stale").unwrap();

        move_file(&from, &to).await.unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"new");
    }

    #[tokio::test]
    async fn create_dir_all_can_erase() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("extract");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale.apk"), b"x").unwrap();

        create_dir_all(&target, true).await.unwrap();
        assert!(target.is_dir());
        assert!(!target.join("stale.apk").exists());
    }
}
