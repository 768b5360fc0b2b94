//! Configuration structures for the release pipeline.
//!
//! Settings are assembled from three layers, later layers winning: built-in
//! defaults, the optional project config file ([`ConfigFile`]), and command
//! line flags. [`SettingsBuilder`] merges them into an immutable [`Settings`].

mod builder;
mod config_file;
mod core;
mod tools;

pub use builder::SettingsBuilder;
pub use config_file::{ConfigFile, DEFAULT_CONFIG_FILE, ToolOverrides};
pub use core::{DEFAULT_NATIVE_DIR, Settings};
pub use tools::ToolSettings;
