//! Signing identity persistence.
//!
//! The identity is created once, on the first production build, and read from
//! disk on every later one. Obtaining an identity ([`IdentitySource`]) and
//! persisting it ([`IdentityStore`]) are separate so the pipeline can be
//! driven with an in-memory identity.
//!
//! Keystore existence and password correctness are not checked here; the
//! signing tool is the only thing that can tell.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::error::{Error, ErrorExt, Result};
use crate::cli::Prompter;

/// Default identity file name, relative to the invocation directory.
pub const DEFAULT_IDENTITY_FILE: &str = "keystore_config.json";

/// Keystore, alias and the two passwords used to sign release artifacts.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningIdentity {
    keystore_path: PathBuf,
    alias: String,
    keystore_password: String,
    alias_password: String,
}

impl SigningIdentity {
    /// Creates an identity from its four fields.
    pub fn new(
        keystore_path: impl Into<PathBuf>,
        alias: impl Into<String>,
        keystore_password: impl Into<String>,
        alias_password: impl Into<String>,
    ) -> Self {
        Self {
            keystore_path: keystore_path.into(),
            alias: alias.into(),
            keystore_password: keystore_password.into(),
            alias_password: alias_password.into(),
        }
    }

    /// Keystore file.
    pub fn keystore_path(&self) -> &Path {
        &self.keystore_path
    }

    /// Key alias inside the keystore.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Keystore password.
    pub fn keystore_password(&self) -> &str {
        &self.keystore_password
    }

    /// Password of the aliased key.
    pub fn alias_password(&self) -> &str {
        &self.alias_password
    }

    /// Name of the first empty field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.keystore_path.as_os_str().is_empty() {
            Some("keystore_path")
        } else if self.alias.trim().is_empty() {
            Some("alias")
        } else if self.keystore_password.is_empty() {
            Some("keystore_password")
        } else if self.alias_password.is_empty() {
            Some("alias_password")
        } else {
            None
        }
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("keystore_path", &self.keystore_path)
            .field("alias", &self.alias)
            .field("keystore_password", &"<redacted>")
            .field("alias_password", &"<redacted>")
            .finish()
    }
}

/// Somewhere a new identity can be obtained from.
pub trait IdentitySource {
    /// Produces a complete identity.
    fn obtain(&mut self) -> Result<SigningIdentity>;
}

/// A fixed, already known identity.
#[derive(Debug, Clone)]
pub struct StaticIdentitySource(pub SigningIdentity);

impl IdentitySource for StaticIdentitySource {
    fn obtain(&mut self) -> Result<SigningIdentity> {
        Ok(self.0.clone())
    }
}

/// Asks the operator for each field, repeating until it is non-empty.
pub struct PromptIdentitySource<'a> {
    prompter: &'a mut dyn Prompter,
}

impl<'a> PromptIdentitySource<'a> {
    /// Wraps an interactive prompter.
    pub fn new(prompter: &'a mut dyn Prompter) -> Self {
        Self { prompter }
    }

    fn ask_required(&mut self, question: &str, secret: bool) -> Result<String> {
        loop {
            let answer = if secret {
                self.prompter.ask_secret(question)?
            } else {
                self.prompter.ask(question)?
            };
            if !answer.is_empty() {
                return Ok(answer);
            }
            log::warn!("A value is required");
        }
    }
}

impl IdentitySource for PromptIdentitySource<'_> {
    fn obtain(&mut self) -> Result<SigningIdentity> {
        let keystore_path = self.ask_required("Keystore path: ", false)?;
        let alias = self.ask_required("Key alias: ", false)?;
        let keystore_password = self.ask_required("Keystore password: ", true)?;
        let alias_password = self.ask_required("Key password: ", true)?;
        Ok(SigningIdentity::new(
            keystore_path,
            alias,
            keystore_password,
            alias_password,
        ))
    }
}

/// On-disk home of the signing identity.
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Identity file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted identity, creating it from `source` first if
    /// none exists. Writes to disk only on creation.
    pub async fn load_or_create(&self, source: &mut dyn IdentitySource) -> Result<SigningIdentity> {
        if let Some(identity) = self.load().await? {
            log::info!("Using signing identity from {}", self.path.display());
            return Ok(identity);
        }

        log::info!(
            "No signing identity at {}, creating one",
            self.path.display()
        );
        let identity = source.obtain()?;
        self.persist(&identity).await?;
        Ok(identity)
    }

    /// Reads the persisted identity, `None` when the file does not exist.
    pub async fn load(&self) -> Result<Option<SigningIdentity>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).fs_context("reading signing identity", &self.path),
        };

        let identity: SigningIdentity =
            serde_json::from_str(&raw).map_err(|e| self.malformed(e.to_string()))?;
        if let Some(field) = identity.missing_field() {
            return Err(self.malformed(format!("field '{}' is empty", field)));
        }
        Ok(Some(identity))
    }

    /// Writes `identity` as indented JSON, owner-readable only on Unix.
    pub async fn persist(&self, identity: &SigningIdentity) -> Result<()> {
        if let Some(field) = identity.missing_field() {
            return Err(self.malformed(format!("refusing to persist empty '{}'", field)));
        }

        let json = serde_json::to_string_pretty(identity)
            .map_err(|e| self.malformed(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating identity directory", parent)?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .fs_context("writing signing identity", &self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .fs_context("restricting signing identity", &self.path)?;
        }

        log::info!("Saved signing identity to {}", self.path.display());
        Ok(())
    }

    fn malformed(&self, reason: String) -> Error {
        Error::MalformedIdentity {
            path: self.path.clone(),
            reason,
        }
    }
}
