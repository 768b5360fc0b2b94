//! Short-lived password files handed to signing tools.
//!
//! Passwords never travel as process arguments. Each signing or conversion
//! call writes them into a private temporary directory and passes file
//! references instead; the directory is removed when the guard drops.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use super::{
    error::{ErrorExt, Result},
    identity::SigningIdentity,
};

/// Password files for one tool invocation.
#[derive(Debug)]
pub struct CredentialFiles {
    _dir: TempDir,
    keystore_password: PathBuf,
    alias_password: PathBuf,
}

impl CredentialFiles {
    /// Writes both passwords of `identity` to owner-only files.
    pub fn write(identity: &SigningIdentity) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("kodegen-android-ks-")
            .tempdir()
            .fs_context("creating credential directory", std::env::temp_dir())?;

        let keystore_password = dir.path().join("keystore.pass");
        let alias_password = dir.path().join("alias.pass");
        write_private(&keystore_password, identity.keystore_password())?;
        write_private(&alias_password, identity.alias_password())?;

        Ok(Self {
            _dir: dir,
            keystore_password,
            alias_password,
        })
    }

    /// File holding the keystore password.
    pub fn keystore_password(&self) -> &Path {
        &self.keystore_password
    }

    /// File holding the alias (key) password.
    pub fn alias_password(&self) -> &Path {
        &self.alias_password
    }
}

fn write_private(path: &Path, secret: &str) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).fs_context("creating credential file", path)?;
    file.write_all(secret.as_bytes())
        .fs_context("writing credential file", path)?;
    Ok(())
}
