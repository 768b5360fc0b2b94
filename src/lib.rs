//! Release pipeline for Cordova Android projects.
//!
//! This library builds the web and native parts of a Cordova project, locates
//! the produced APK or AAB, signs and aligns release builds, and delivers the
//! result to a device or a folder. A `snapshot` helper maps a source tree to
//! JSON.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod snapshot;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
