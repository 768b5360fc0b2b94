//! Builder for constructing Settings.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use path_absolutize::Absolutize;

use super::{ConfigFile, Settings, ToolSettings, core::DEFAULT_NATIVE_DIR};
use crate::bundler::{
    error::{ErrorExt, Result},
    identity::DEFAULT_IDENTITY_FILE,
};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_android::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_android::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root("./budget-app")
///     .package_id("com.example.budget")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    native_dir: Option<PathBuf>,
    identity_file: Option<PathBuf>,
    package_id: Option<String>,
    tool_timeout: Option<Duration>,
    tools: ToolSettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the web project root. Default: the current directory.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the native project directory, relative to the project root
    /// unless absolute. Default: `cordova`.
    pub fn native_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.native_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the signing identity file, relative to the invocation directory
    /// unless absolute. Default: `keystore_config.json`.
    pub fn identity_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.identity_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the application identifier.
    pub fn package_id(mut self, id: impl Into<String>) -> Self {
        self.package_id = Some(id.into());
        self
    }

    /// Sets the per-tool timeout.
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// Replaces the tool configuration.
    pub fn tools(mut self, tools: ToolSettings) -> Self {
        self.tools = tools;
        self
    }

    /// Layers a config file under whatever has been set explicitly.
    ///
    /// Values already on the builder are kept; the file only fills gaps.
    pub fn config_file(mut self, config: ConfigFile) -> Self {
        if self.native_dir.is_none() {
            self.native_dir = config.native_dir;
        }
        if self.identity_file.is_none() {
            self.identity_file = config.identity_file;
        }
        if self.package_id.is_none() {
            self.package_id = config.package_id;
        }
        if self.tool_timeout.is_none() {
            self.tool_timeout = config.tool_timeout_secs.map(Duration::from_secs);
        }
        self.tools.apply(config.tools);
        self
    }

    /// Builds the settings, resolving every path to an absolute one.
    pub fn build(self) -> Result<Settings> {
        let project_root = absolute(self.project_root.unwrap_or_else(|| PathBuf::from(".")))?;

        let native_dir = self
            .native_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NATIVE_DIR));
        let native_dir = if native_dir.is_absolute() {
            native_dir
        } else {
            project_root.join(native_dir)
        };

        let identity_file = absolute(
            self.identity_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IDENTITY_FILE)),
        )?;

        Ok(Settings {
            project_root,
            native_dir,
            identity_file,
            package_id: self.package_id.filter(|id| !id.trim().is_empty()),
            tool_timeout: self.tool_timeout.filter(|t| !t.is_zero()),
            tools: self.tools,
        })
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .fs_context("resolving path", &path)
}
