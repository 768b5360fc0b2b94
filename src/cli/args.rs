//! Command line argument parsing and validation.
//!
//! Every deploy answer can be given as a flag; anything left out is asked
//! for interactively when the pipeline reaches it.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::bundler::{self, BuildVariant, DeliveryChoice, PipelineOptions};

/// Release pipeline for Cordova Android projects
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_android",
    version,
    about = "Build, sign and deliver Cordova Android releases",
    long_about = "Builds the web assets and the native Android project, finds the produced
APK or AAB, signs and aligns release builds with a persisted keystore identity,
then installs the result on a device or opens its folder.

Usage:
  kodegen_bundler_android
  kodegen_bundler_android deploy --variant release --delivery install --skip-commit --yes
  kodegen_bundler_android snapshot ./src --output tree.json

Running without a subcommand is the same as `deploy`.",
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub deploy: DeployArgs,

    /// Echo tool output and detail lines
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, sign and deliver the app (default)
    Deploy(DeployArgs),
    /// Write a directory tree and its file contents to a JSON file
    Snapshot(SnapshotArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Web project root containing package.json and the cordova/ directory
    #[arg(long, value_name = "DIR", default_value = ".", env = "KODEGEN_ANDROID_PROJECT")]
    pub project: PathBuf,

    /// Build variant: debug or release
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<String>,

    /// Delivery: install (on the attached device) or open (the artifact folder)
    #[arg(long, value_name = "MODE")]
    pub delivery: Option<String>,

    /// Commit pending changes with this message before building
    #[arg(short = 'm', long, value_name = "MESSAGE", conflicts_with = "skip_commit")]
    pub commit_message: Option<String>,

    /// Do not commit or ask for a commit message
    #[arg(long)]
    pub skip_commit: bool,

    /// Build without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Install without launching the app afterwards
    #[arg(long)]
    pub no_launch: bool,

    /// Kill any external tool running longer than this many seconds
    #[arg(long, value_name = "SECS", env = "KODEGEN_ANDROID_TOOL_TIMEOUT")]
    pub tool_timeout: Option<u64>,

    /// Config file (default: <project>/kodegen-android.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Signing identity file (default: ./keystore_config.json)
    #[arg(long, value_name = "FILE", env = "KODEGEN_ANDROID_IDENTITY")]
    pub identity_file: Option<PathBuf>,

    /// Application identifier used for launch (default: read from config.xml)
    #[arg(long, value_name = "ID")]
    pub package_id: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SnapshotArgs {
    /// Directory to snapshot (asked for when omitted)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE", default_value = "directory_structure.json")]
    pub output: PathBuf,

    /// Additional file or directory name to skip (repeatable)
    #[arg(long, value_name = "NAME")]
    pub ignore: Vec<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Command::Snapshot(snapshot)) = &self.command {
            for name in &snapshot.ignore {
                if name.trim().is_empty() {
                    return Err("--ignore names cannot be empty".to_string());
                }
                if name.contains('/') || name.contains('\\') {
                    return Err(format!(
                        "--ignore takes a file or directory name, not a path: {}",
                        name
                    ));
                }
            }
        }
        Ok(())
    }

    /// The command to run; no subcommand means deploy.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Deploy(self.deploy))
    }
}

impl DeployArgs {
    /// Pipeline answers taken from the flags.
    ///
    /// Variant and delivery go through the same parsing as interactive
    /// answers so a bad flag fails with the same error.
    pub fn pipeline_options(&self) -> bundler::Result<PipelineOptions> {
        let variant = self
            .variant
            .as_deref()
            .map(str::parse::<BuildVariant>)
            .transpose()?;
        let delivery = self
            .delivery
            .as_deref()
            .map(str::parse::<DeliveryChoice>)
            .transpose()?;

        Ok(PipelineOptions {
            variant,
            delivery,
            commit_message: self.commit_message.clone(),
            skip_commit: self.skip_commit,
            assume_yes: self.yes,
            launch: !self.no_launch,
        })
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
