//! Optional per-project TOML configuration.
//!
//! ```toml
//! native_dir = "cordova"
//! identity_file = "keystore_config.json"
//! package_id = "com.example.budget"
//! tool_timeout_secs = 1800
//!
//! [tools]
//! bundletool = "java -jar /opt/android/bundletool-all.jar"
//! zipalign = "/opt/android/build-tools/34.0.0/zipalign"
//! adb = ["C:\\Program Files\\Android\\platform-tools\\adb.exe"]
//! ```
//!
//! A tool given as a string is split on whitespace; an array is taken as the
//! exact program and leading arguments. A relative `identity_file` is
//! resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bundler::{
    error::{Context, ErrorExt, Result},
    tools::ToolSpec,
};

/// Config file name looked up in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "kodegen-android.toml";

/// Contents of the project config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Native project directory, relative to the project root
    pub native_dir: Option<PathBuf>,
    /// Signing identity file, relative to the config file's directory
    pub identity_file: Option<PathBuf>,
    /// Application identifier used to launch after install
    pub package_id: Option<String>,
    /// Per-tool timeout in seconds
    pub tool_timeout_secs: Option<u64>,
    /// Tool command overrides
    pub tools: ToolOverrides,
}

/// Tool command lines from the `[tools]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolOverrides {
    pub npm: Option<ToolSpec>,
    pub cordova: Option<ToolSpec>,
    pub jarsigner: Option<ToolSpec>,
    pub zipalign: Option<ToolSpec>,
    pub bundletool: Option<ToolSpec>,
    pub adb: Option<ToolSpec>,
    pub git: Option<ToolSpec>,
    pub opener: Option<ToolSpec>,
}

impl ConfigFile {
    /// Parses config text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    /// Loads `path`, `None` when the file does not exist.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).fs_context("reading config file", path),
        };
        log::debug!("Loaded config from {}", path.display());
        let mut config = Self::parse(&text).context(&format!("{}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        Ok(Some(config))
    }

    fn resolve_relative_to(&mut self, dir: &Path) {
        if let Some(file) = self.identity_file.take() {
            self.identity_file = Some(if file.is_absolute() {
                file
            } else {
                dir.join(file)
            });
        }
    }
}
