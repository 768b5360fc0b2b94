//! Signing and alignment of release packages.
//!
//! Installable packages are signed in place, then aligned into the output
//! path. Bundles are handed to the [`BundleConverter`] instead: the converter
//! signs while building the universal package, so neither the signing nor
//! the alignment tool runs for them.

use std::path::Path;

use super::{
    artifact::{ArtifactKind, ArtifactRef},
    converter::BundleConverter,
    credentials::CredentialFiles,
    error::{Error, Result},
    identity::SigningIdentity,
    settings::ToolSettings,
    tools::{ToolCommand, ToolRunner},
    utils::fs,
};

/// Signature algorithm passed to the signing tool.
pub const SIGNATURE_ALGORITHM: &str = "SHA256withRSA";

/// Digest algorithm passed to the signing tool.
pub const DIGEST_ALGORITHM: &str = "SHA-256";

/// Byte alignment applied to uncompressed package entries.
pub const ALIGNMENT: u32 = 4;

/// Signs and aligns release artifacts.
pub struct Signer<'a> {
    runner: &'a dyn ToolRunner,
    tools: &'a ToolSettings,
}

impl<'a> Signer<'a> {
    /// Signer using the tools configured in `tools`.
    pub fn new(runner: &'a dyn ToolRunner, tools: &'a ToolSettings) -> Self {
        Self { runner, tools }
    }

    /// Produces the terminal, signed package at `output`.
    ///
    /// Overwrites `output` if it exists.
    pub async fn sign_and_align(
        &self,
        input: &ArtifactRef,
        output: &Path,
        identity: &SigningIdentity,
    ) -> Result<ArtifactRef> {
        match input.kind() {
            ArtifactKind::InstallablePackage => {
                self.sign_in_place(input.path(), identity).await?;
                self.align(input.path(), output).await?;
                Ok(ArtifactRef::new(
                    output,
                    ArtifactKind::InstallablePackage,
                    input.variant(),
                ))
            }
            ArtifactKind::DistributableBundle => {
                BundleConverter::new(self.runner, &self.tools.bundletool)
                    .convert(input, output, identity)
                    .await
            }
        }
    }

    async fn sign_in_place(&self, package: &Path, identity: &SigningIdentity) -> Result<()> {
        log::info!("Signing {}", package.display());
        let credentials = CredentialFiles::write(identity)?;

        let command = ToolCommand::new(&self.tools.jarsigner)
            .args(["-sigalg", SIGNATURE_ALGORITHM, "-digestalg", DIGEST_ALGORITHM])
            .arg("-keystore")
            .arg_path(identity.keystore_path())
            .arg("-storepass:file")
            .arg_path(credentials.keystore_password())
            .arg("-keypass:file")
            .arg_path(credentials.alias_password())
            .arg_path(package)
            .arg(identity.alias());

        let result = self.runner.run(&command).await?;
        if !result.is_success() {
            return Err(Error::SigningFailed(result.failure(&command)));
        }
        Ok(())
    }

    async fn align(&self, input: &Path, output: &Path) -> Result<()> {
        log::info!("Aligning {} -> {}", input.display(), output.display());
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent, false).await?;
        }

        let command = ToolCommand::new(&self.tools.zipalign)
            .arg("-f")
            .arg(ALIGNMENT.to_string())
            .arg_path(input)
            .arg_path(output);

        let result = self.runner.run(&command).await?;
        if !result.is_success() {
            return Err(Error::AlignmentFailed(result.failure(&command)));
        }
        Ok(())
    }
}
