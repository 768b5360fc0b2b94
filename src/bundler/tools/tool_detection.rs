//! External tool detection and availability checking.
//!
//! Programs are resolved on `PATH` once per process and cached, so repeated
//! invocations (git, adb) do not rescan the search path.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use crate::bundler::error::{Error, Result};

static RESOLVED: LazyLock<Mutex<HashMap<String, PathBuf>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Resolves `program` to an executable path.
///
/// Absolute and relative paths are accepted as well as bare names.
pub fn resolve_program(program: &str) -> Result<PathBuf> {
    let cached = RESOLVED
        .lock()
        .ok()
        .and_then(|cache| cache.get(program).cloned());
    if let Some(path) = cached {
        return Ok(path);
    }

    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            if let Ok(mut cache) = RESOLVED.lock() {
                cache.insert(program.to_string(), path.clone());
            }
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program, e);
            Err(Error::ToolNotFound {
                program: program.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_tool_not_found() {
        let err = resolve_program("kodegen-no-such-tool-7f3a").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { ref program } if program == "kodegen-no-such-tool-7f3a"));
    }
}
