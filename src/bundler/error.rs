//! Error taxonomy for the release artifact pipeline.
//!
//! Every external-tool failure is terminal for a run. Each variant maps to a
//! distinct process exit code (see [`Error::exit_code`]) so that scripts
//! driving the bundler can tell failures apart.

use std::{
    fmt,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Number of trailing output lines kept when reporting a tool failure.
pub const FAILURE_TAIL_LINES: usize = 40;

/// A non-zero exit (or signal) from an external tool.
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// Rendered command line (never contains secrets)
    pub command: String,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Tail of the captured stderr/stdout
    pub output: String,
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "`{}` exited with code {}", self.command, code)?,
            None => write!(f, "`{}` was terminated by a signal", self.command)?,
        }
        if !self.output.trim().is_empty() {
            write!(f, "\n{}", self.output.trim_end())?;
        }
        Ok(())
    }
}

/// Pipeline error taxonomy.
#[derive(Error, Debug)]
pub enum Error {
    /// Web asset or native build exited non-zero
    #[error("build failed: {0}")]
    BuildFailed(ToolFailure),

    /// Neither output directory holds a matching artifact
    #[error("no build artifact found (searched {})", display_paths(.searched))]
    ArtifactNotFound {
        /// Directories that were scanned
        searched: Vec<PathBuf>,
    },

    /// More than one matching artifact in one output directory
    #[error("ambiguous build artifact in {}: {}", .directory.display(), display_paths(.candidates))]
    AmbiguousArtifact {
        /// Directory holding the duplicates
        directory: PathBuf,
        /// Every matching file
        candidates: Vec<PathBuf>,
    },

    /// Persisted signing identity is unreadable or incomplete
    #[error("malformed signing identity at {}: {reason}", .path.display())]
    MalformedIdentity {
        /// Identity file path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// A step of bundle-to-package conversion failed
    #[error("bundle conversion failed while {step}: {reason}")]
    ConversionFailed {
        /// Conversion step that failed
        step: &'static str,
        /// Failure details
        reason: String,
    },

    /// The extracted APK set holds no universal package
    #[error("no universal.apk found in extracted APK set {}", .extract_dir.display())]
    UniversalArtifactMissing {
        /// Extraction directory that was searched
        extract_dir: PathBuf,
    },

    /// The signing tool exited non-zero
    #[error("signing failed: {0}")]
    SigningFailed(ToolFailure),

    /// The alignment tool exited non-zero
    #[error("alignment failed: {0}")]
    AlignmentFailed(ToolFailure),

    /// Device install exited non-zero
    #[error("install failed: {0}")]
    InstallFailed(ToolFailure),

    /// A bundle was handed to device install without conversion
    #[error("cannot install unconverted bundle {}; choose open delivery or a release build", .0.display())]
    BundleNotInstallable(PathBuf),

    /// Variant choice was neither debug nor release
    #[error("invalid build variant '{input}' (expected debug or release)")]
    InvalidVariant {
        /// Operator input
        input: String,
    },

    /// Delivery choice was neither install nor open
    #[error("invalid delivery choice '{input}' (expected install or open)")]
    InvalidDeliveryChoice {
        /// Operator input
        input: String,
    },

    /// A git invocation exited non-zero
    #[error("version control failed: {0}")]
    VersionControlFailed(ToolFailure),

    /// A required program is not on PATH
    #[error("required tool '{program}' not found in PATH")]
    ToolNotFound {
        /// Program name
        program: String,
    },

    /// A tool exceeded the configured timeout and was killed
    #[error("`{command}` timed out after {seconds}s and was terminated")]
    ToolTimedOut {
        /// Rendered command line
        command: String,
        /// Configured timeout
        seconds: u64,
    },

    /// The project root has no native project directory
    #[error("native project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    /// I/O failure with the action and path that caused it
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Bare I/O failure
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BuildFailed(_) => 10,
            Error::ArtifactNotFound { .. } => 11,
            Error::AmbiguousArtifact { .. } => 12,
            Error::MalformedIdentity { .. } => 13,
            Error::ConversionFailed { .. } => 14,
            Error::UniversalArtifactMissing { .. } => 15,
            Error::SigningFailed(_) => 16,
            Error::AlignmentFailed(_) => 17,
            Error::InstallFailed(_) => 18,
            Error::InvalidVariant { .. } => 19,
            Error::InvalidDeliveryChoice { .. } => 20,
            Error::VersionControlFailed(_) => 21,
            Error::ToolNotFound { .. } => 22,
            Error::ToolTimedOut { .. } => 23,
            Error::ProjectNotFound(_) => 24,
            Error::BundleNotInstallable(_) => 25,
            Error::Fs { .. } | Error::IoError(_) | Error::GenericError(_) => 1,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attaches an action and a path to I/O errors.
pub trait ErrorExt<T> {
    /// Wraps the error as [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Adds a message to any displayable error, producing [`Error::GenericError`].
pub trait Context<T> {
    /// Prefixes the error with `msg`.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {}", msg, e)))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
