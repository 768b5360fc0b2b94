//! `snapshot` subcommand.

use std::path::PathBuf;

use crate::{
    cli::{Prompter, RuntimeConfig, StdinPrompter, args::SnapshotArgs},
    error::Result,
    snapshot::{IgnoreList, write_snapshot},
};

const DIR_QUESTION: &str =
    "Enter the path of the directory you want to export (default: current directory): ";

/// Writes the snapshot of the chosen directory.
pub async fn execute(args: SnapshotArgs, config: &RuntimeConfig) -> Result<i32> {
    let output = config.output();

    let root = match args.dir {
        Some(dir) => dir,
        None => {
            let answer = StdinPrompter::new(output.clone()).ask(DIR_QUESTION)?;
            if answer.is_empty() {
                std::env::current_dir()?
            } else {
                PathBuf::from(answer)
            }
        }
    };

    output.progress(&format!("Snapshotting {}", root.display()));
    write_snapshot(root, &args.output, IgnoreList::with_extra(args.ignore)).await?;
    output.success(&format!("Directory structure saved to {}", args.output.display()));
    Ok(0)
}
