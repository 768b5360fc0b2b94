//! External tool configuration.

use super::config_file::ToolOverrides;
use crate::bundler::tools::ToolSpec;

/// Programs used for every external step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// Web asset build (`npm run build`)
    pub npm: ToolSpec,
    /// Native packaging (`cordova build android`)
    pub cordova: ToolSpec,
    /// Package signing
    pub jarsigner: ToolSpec,
    /// Package alignment
    pub zipalign: ToolSpec,
    /// Bundle to APK set conversion
    pub bundletool: ToolSpec,
    /// Device install and launch
    pub adb: ToolSpec,
    /// Version control
    pub git: ToolSpec,
    /// Folder opener for manual distribution
    pub opener: ToolSpec,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            npm: ToolSpec::program("npm"),
            cordova: ToolSpec::program("cordova"),
            jarsigner: ToolSpec::program("jarsigner"),
            zipalign: ToolSpec::program("zipalign"),
            bundletool: ToolSpec::program("bundletool"),
            adb: ToolSpec::program("adb"),
            git: ToolSpec::program("git"),
            opener: ToolSpec::program(default_opener()),
        }
    }
}

impl ToolSettings {
    /// Replaces every tool named in `overrides`.
    pub fn apply(&mut self, overrides: ToolOverrides) {
        let ToolOverrides {
            npm,
            cordova,
            jarsigner,
            zipalign,
            bundletool,
            adb,
            git,
            opener,
        } = overrides;

        for (slot, value) in [
            (&mut self.npm, npm),
            (&mut self.cordova, cordova),
            (&mut self.jarsigner, jarsigner),
            (&mut self.zipalign, zipalign),
            (&mut self.bundletool, bundletool),
            (&mut self.adb, adb),
            (&mut self.git, git),
            (&mut self.opener, opener),
        ] {
            if let Some(spec) = value {
                *slot = spec;
            }
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}
