//! Release artifact pipeline for Cordova Android projects.
//!
//! The pipeline picks a build variant, runs the web and native builds, finds
//! the artifact the native build produced, signs it when the variant requires
//! it, and hands the result to a delivery step.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_android::bundler::{
//!     BuildVariant, DeliveryChoice, PipelineOptions, PipelineRun, ProcessRunner,
//!     ReleasePipeline, SettingsBuilder,
//! };
//! use kodegen_bundler_android::cli::{OutputManager, StdinPrompter};
//!
//! # async fn example() -> kodegen_bundler_android::bundler::Result<()> {
//! let settings = SettingsBuilder::new().project_root(".").build()?;
//! let output = OutputManager::new(false, false);
//! let runner = ProcessRunner::new(output.clone(), settings.tool_timeout());
//! let mut prompter = StdinPrompter::new(output.clone());
//!
//! let options = PipelineOptions {
//!     variant: Some(BuildVariant::Release),
//!     delivery: Some(DeliveryChoice::OpenFolder),
//!     skip_commit: true,
//!     assume_yes: true,
//!     ..Default::default()
//! };
//! let mut run = PipelineRun::new();
//! ReleasePipeline::new(&settings, &runner, &mut prompter, &output)
//!     .run(&options, &mut run)
//!     .await?;
//! println!("{:?}", run.terminal());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`artifact`] - variants, artifact kinds and references
//! - [`identity`] - signing identity creation and persistence
//! - [`locator`] - finding the native build's output
//! - [`converter`] - bundle to universal package conversion
//! - [`signer`] - signing and alignment
//! - [`delivery`] - install/launch or open folder
//! - [`vcs`] - optional pre-build commit
//! - [`pipeline`] - the state machine tying it together
//! - [`tools`] - external tool invocation

pub mod artifact;
pub mod checksum;
pub mod converter;
mod credentials;
pub mod delivery;
mod error;
pub mod identity;
pub mod locator;
pub mod pipeline;
pub mod settings;
pub mod signer;
pub mod tools;
mod utils;
pub mod vcs;

pub use artifact::{ArtifactKind, ArtifactRef, BuildVariant};
pub use converter::BundleConverter;
pub use delivery::{Delivery, DeliveryChoice, DeliveryOutcome};
pub use error::{Context, Error, ErrorExt, Result, ToolFailure};
pub use identity::{
    IdentitySource, IdentityStore, PromptIdentitySource, SigningIdentity, StaticIdentitySource,
};
pub use pipeline::{PipelineOptions, PipelineRun, PipelineState, ReleasePipeline};
pub use settings::{ConfigFile, Settings, SettingsBuilder, ToolSettings};
pub use signer::Signer;
pub use tools::{ProcessRunner, ToolCommand, ToolOutput, ToolRunner, ToolSpec};
pub use vcs::{CommitOutcome, GitRepository};
