//! Application metadata from the native project's `config.xml`.

use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::error::{BundlerError, CliError, Result};

/// `<widget ... id="com.example.app" ...>`; attribute order varies between
/// project generators.
static WIDGET_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<widget\b[^>]*?\sid\s*=\s*["']([^"']+)["']"#).expect("widget id pattern is valid")
});

/// Extracts the application identifier from `config.xml` text.
pub fn parse_package_id(config_xml: &str) -> Option<String> {
    WIDGET_ID
        .captures(config_xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Reads the application identifier from the `config.xml` at `path`.
pub async fn read_package_id(path: &Path) -> Result<String> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_config_xml".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    parse_package_id(&text).ok_or_else(|| {
        BundlerError::Cli(CliError::InvalidArguments {
            reason: format!("No <widget id=\"...\"> in {}", path.display()),
        })
    })
}
