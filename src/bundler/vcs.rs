//! Git collaborator: stage, check, commit.

use std::path::Path;

use super::{
    error::{Error, Result},
    tools::{ToolCommand, ToolRunner, ToolSpec},
};

/// Result of the optional commit step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommitOutcome {
    /// No message given, nothing attempted
    #[default]
    Skipped,
    /// Staged, but the tree was already clean
    NothingToCommit,
    /// Committed with this message
    Committed(String),
}

/// A working tree driven through the git command line.
pub struct GitRepository<'a> {
    runner: &'a dyn ToolRunner,
    git: &'a ToolSpec,
    path: &'a Path,
}

impl<'a> GitRepository<'a> {
    /// Repository rooted at `path`.
    pub fn new(runner: &'a dyn ToolRunner, git: &'a ToolSpec, path: &'a Path) -> Self {
        Self { runner, git, path }
    }

    /// Stages every change (`git add .`).
    pub async fn stage_all(&self) -> Result<()> {
        self.git(&["add", "."]).await.map(|_| ())
    }

    /// Whether anything is staged or modified.
    pub async fn has_pending_changes(&self) -> Result<bool> {
        let status = self.git(&["status", "--porcelain"]).await?;
        Ok(!status.trim().is_empty())
    }

    /// Commits the staged changes.
    pub async fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).await.map(|_| ())
    }

    /// Stages and commits everything under `message`.
    ///
    /// A blank message skips the step; a clean tree is not an error.
    pub async fn commit_pending(&self, message: &str) -> Result<CommitOutcome> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(CommitOutcome::Skipped);
        }

        self.stage_all().await?;
        if !self.has_pending_changes().await? {
            log::info!("Nothing to commit in {}", self.path.display());
            return Ok(CommitOutcome::NothingToCommit);
        }
        self.commit(message).await?;
        Ok(CommitOutcome::Committed(message.to_string()))
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        let command = ToolCommand::new(self.git)
            .args(args.iter().copied())
            .current_dir(self.path);
        let result = self.runner.run(&command).await?;
        if !result.is_success() {
            return Err(Error::VersionControlFailed(result.failure(&command)));
        }
        Ok(result.stdout)
    }
}
