//! Command line interface for the Android release pipeline.
//!
//! This module provides argument parsing, command execution, operator prompts
//! and colored feedback.

mod args;
pub mod commands;
mod output;
mod prompt;

pub use args::{Args, Command, DeployArgs, RuntimeConfig, SnapshotArgs};
pub use output::OutputManager;
pub use prompt::{Prompter, ScriptedPrompter, StdinPrompter};

use crate::error::{BundlerError, CliError, Result};

/// Main CLI entry point. Returns the process exit code.
///
/// Command failures are reported here and turned into their exit code; only
/// failures to report escape as `Err`.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    if let Err(reason) = args.validate() {
        return Err(CliError::InvalidArguments { reason }.into());
    }

    let config = RuntimeConfig::from(&args);
    let result = match args.into_command() {
        Command::Deploy(deploy) => commands::deploy::execute(deploy, &config).await,
        Command::Snapshot(snapshot) => commands::snapshot::execute(snapshot, &config).await,
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            report(&e, config.output());
            Ok(e.exit_code())
        }
    }
}

/// Prints `error` and its recovery suggestions.
pub fn report(error: &BundlerError, output: &OutputManager) {
    output.error(&error.to_string());
    for suggestion in error.recovery_suggestions() {
        output.warn(&suggestion);
    }
}
