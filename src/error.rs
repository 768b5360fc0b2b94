//! Top-level error types for the CLI.
//!
//! Pipeline failures keep their own taxonomy ([`crate::bundler::Error`]); this
//! layer adds CLI misuse and ambient failures and maps everything to a process
//! exit code.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline errors
    #[error("{0}")]
    Pipeline(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundlerError::Pipeline(e) => e.exit_code(),
            BundlerError::Cli(CliError::InvalidArguments { .. }) => 2,
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;

        match self {
            BundlerError::Pipeline(E::MalformedIdentity { path, .. }) => vec![format!(
                "Fix or delete {} and re-run to enter the signing identity again",
                path.display()
            )],
            BundlerError::Pipeline(E::ArtifactNotFound { .. } | E::AmbiguousArtifact { .. }) => {
                vec!["Clean the native build outputs and rebuild".to_string()]
            }
            BundlerError::Pipeline(E::SigningFailed(_) | E::ConversionFailed { .. }) => {
                vec!["Check the keystore path, alias and passwords in the identity file".to_string()]
            }
            BundlerError::Pipeline(E::InstallFailed(_)) => vec![
                "Check that a device is attached and authorized (`adb devices`)".to_string(),
                "The signed artifact is still on disk and can be installed manually".to_string(),
            ],
            BundlerError::Pipeline(E::BundleNotInstallable(_)) => vec![
                "Re-run with --delivery open, or build the release variant to get a package"
                    .to_string(),
            ],
            BundlerError::Pipeline(E::ToolNotFound { program }) => vec![format!(
                "Install {} or point to it in the [tools] table of the config file",
                program
            )],
            BundlerError::Pipeline(E::InvalidVariant { .. } | E::InvalidDeliveryChoice { .. }) => {
                vec!["Re-run and answer with one of the listed choices".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
