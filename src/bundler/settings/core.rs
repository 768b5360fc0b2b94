//! Core Settings struct and implementations.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use super::ToolSettings;

/// Default native project directory inside the project root.
pub const DEFAULT_NATIVE_DIR: &str = "cordova";

/// Main settings for a pipeline run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). All paths are
/// absolute.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Web project root (where `npm run build` runs).
    pub(super) project_root: PathBuf,

    /// Native project directory (where `cordova build` runs).
    pub(super) native_dir: PathBuf,

    /// Signing identity record.
    pub(super) identity_file: PathBuf,

    /// Application identifier; read from `config.xml` when `None`.
    pub(super) package_id: Option<String>,

    /// Per-tool timeout, `None` waits forever.
    pub(super) tool_timeout: Option<Duration>,

    /// External programs.
    pub(super) tools: ToolSettings,
}

impl Settings {
    /// Returns the web project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the native project directory.
    pub fn native_dir(&self) -> &Path {
        &self.native_dir
    }

    /// Returns the root of the native build's output layout.
    pub fn build_root(&self) -> PathBuf {
        self.native_dir
            .join("platforms")
            .join("android")
            .join("app")
            .join("build")
            .join("outputs")
    }

    /// Returns the native project's manifest.
    pub fn config_xml(&self) -> PathBuf {
        self.native_dir.join("config.xml")
    }

    /// Returns the signing identity file.
    pub fn identity_file(&self) -> &Path {
        &self.identity_file
    }

    /// Returns the configured application identifier.
    pub fn package_id(&self) -> Option<&str> {
        self.package_id.as_deref()
    }

    /// Returns the per-tool timeout.
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout
    }

    /// Returns the external tool configuration.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }
}
