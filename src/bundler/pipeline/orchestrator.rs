//! The release pipeline: build, locate, sign, deliver.

use crate::{
    bundler::{
        Result,
        artifact::{ArtifactRef, BuildVariant},
        checksum::calculate_sha256,
        delivery::{Delivery, DeliveryChoice},
        error::{Error, ErrorExt},
        identity::{IdentitySource, IdentityStore, PromptIdentitySource, SigningIdentity},
        locator,
        settings::Settings,
        signer::Signer,
        tools::{ToolCommand, ToolRunner},
        vcs::{CommitOutcome, GitRepository},
    },
    cli::{OutputManager, Prompter},
    metadata,
};

use super::state::{PipelineRun, PipelineState};

const COMMIT_QUESTION: &str = "Enter git commit message (or leave blank to skip): ";
const CONFIRM_QUESTION: &str = "Build and deploy? (y/n): ";
const VARIANT_QUESTION: &str = "Build type [1] debug  [2] release: ";
const DELIVERY_QUESTION: &str = "Deliver by [1] install on device  [2] open folder: ";

/// Answers supplied up front. Anything left `None` is asked interactively.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Build variant
    pub variant: Option<BuildVariant>,
    /// Delivery mode
    pub delivery: Option<DeliveryChoice>,
    /// Commit message; blank skips the commit
    pub commit_message: Option<String>,
    /// Skip the commit step without asking
    pub skip_commit: bool,
    /// Skip the build confirmation
    pub assume_yes: bool,
    /// Launch the application after installing it
    pub launch: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            variant: None,
            delivery: None,
            commit_message: None,
            skip_commit: false,
            assume_yes: false,
            launch: true,
        }
    }
}

/// Drives one release from source tree to delivered artifact.
///
/// External tools run through the injected [`ToolRunner`], operator answers
/// come from the injected [`Prompter`]. A release run that finds no persisted
/// signing identity obtains one from the identity source, which defaults to
/// asking through the same prompter.
pub struct ReleasePipeline<'a> {
    settings: &'a Settings,
    runner: &'a dyn ToolRunner,
    prompter: &'a mut dyn Prompter,
    identity_source: Option<Box<dyn IdentitySource + 'a>>,
    output: &'a OutputManager,
}

impl<'a> ReleasePipeline<'a> {
    /// Pipeline over `settings`.
    pub fn new(
        settings: &'a Settings,
        runner: &'a dyn ToolRunner,
        prompter: &'a mut dyn Prompter,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            settings,
            runner,
            prompter,
            identity_source: None,
            output,
        }
    }

    /// Uses `source` instead of prompting when a new identity is needed.
    pub fn with_identity_source(mut self, source: Box<dyn IdentitySource + 'a>) -> Self {
        self.identity_source = Some(source);
        self
    }

    /// Runs the pipeline, recording progress in `run`.
    ///
    /// On error `run` is left in [`PipelineState::Aborted`] with everything
    /// produced up to the failure still recorded.
    pub async fn run(&mut self, options: &PipelineOptions, run: &mut PipelineRun) -> Result<()> {
        let result = self.execute(options, run).await;
        if result.is_err() {
            run.abort();
        }
        result
    }

    async fn execute(&mut self, options: &PipelineOptions, run: &mut PipelineRun) -> Result<()> {
        self.ensure_project().await?;

        run.set_commit(self.commit_step(options).await?);

        if !options.assume_yes && !self.confirm()? {
            self.output.warn("Build cancelled, nothing was built");
            run.set_declined();
            return Ok(());
        }

        let variant = match options.variant {
            Some(variant) => variant,
            None => self.prompter.ask(VARIANT_QUESTION)?.parse()?,
        };
        run.set_variant(variant);

        // Resolved before any build so a broken identity costs nothing
        let identity = if variant.requires_signing() {
            Some(self.resolve_identity().await?)
        } else {
            None
        };
        run.advance(PipelineState::VariantChosen)?;

        self.build_web_assets().await?;
        run.advance(PipelineState::WebAssetsBuilt)?;

        self.build_native(variant).await?;
        run.advance(PipelineState::NativeBuilt)?;

        let located = locator::locate(&self.settings.build_root(), variant).await?;
        self.output
            .success(&format!("Found {}", located.path().display()));
        run.set_intermediate(located.clone());
        run.advance(PipelineState::ArtifactLocated)?;

        let terminal = match identity {
            Some(identity) => {
                let signed = self.sign(&located, &identity).await?;
                run.advance(PipelineState::Signed)?;
                signed
            }
            None => {
                run.advance(PipelineState::Unsigned)?;
                located
            }
        };

        let checksum = self.report_artifact(&terminal).await?;
        run.set_terminal(terminal.clone(), checksum);

        let choice = match options.delivery {
            Some(choice) => choice,
            None => self.prompter.ask(DELIVERY_QUESTION)?.parse()?,
        };
        run.set_delivery(choice);

        let package_id = if options.launch && choice == DeliveryChoice::Install {
            self.package_id().await
        } else {
            None
        };

        self.output.section("Delivering");
        let outcome = Delivery::new(self.runner, self.settings.tools())
            .deliver(&terminal, choice, package_id.as_deref())
            .await?;
        run.set_delivered(outcome);
        run.advance(PipelineState::Delivered)?;

        self.output.success("Release pipeline finished");
        run.advance(PipelineState::Done)
    }

    async fn ensure_project(&self) -> Result<()> {
        let native_dir = self.settings.native_dir();
        match tokio::fs::metadata(native_dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(Error::ProjectNotFound(native_dir.to_path_buf())),
        }
    }

    async fn commit_step(&mut self, options: &PipelineOptions) -> Result<CommitOutcome> {
        if options.skip_commit {
            return Ok(CommitOutcome::Skipped);
        }
        let message = match &options.commit_message {
            Some(message) => message.clone(),
            None => self.prompter.ask(COMMIT_QUESTION)?,
        };

        let repository = GitRepository::new(
            self.runner,
            &self.settings.tools().git,
            self.settings.project_root(),
        );
        let outcome = repository.commit_pending(&message).await?;
        match &outcome {
            CommitOutcome::Skipped => self.output.verbose("Skipping commit"),
            CommitOutcome::NothingToCommit => self.output.progress("Nothing to commit"),
            CommitOutcome::Committed(message) => {
                self.output.success(&format!("Committed: {}", message))
            }
        }
        Ok(outcome)
    }

    fn confirm(&mut self) -> Result<bool> {
        let answer = self.prompter.ask(CONFIRM_QUESTION)?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    async fn resolve_identity(&mut self) -> Result<SigningIdentity> {
        let store = IdentityStore::new(self.settings.identity_file());
        match self.identity_source.as_mut() {
            Some(source) => store.load_or_create(source.as_mut()).await,
            None => {
                let mut source = PromptIdentitySource::new(&mut *self.prompter);
                store.load_or_create(&mut source).await
            }
        }
    }

    async fn build_web_assets(&self) -> Result<()> {
        self.output.section("Building web assets");
        let command = ToolCommand::new(&self.settings.tools().npm)
            .args(["run", "build"])
            .current_dir(self.settings.project_root());
        self.build(command).await
    }

    async fn build_native(&self, variant: BuildVariant) -> Result<()> {
        self.output
            .section(&format!("Building native package ({})", variant));
        let mut command = ToolCommand::new(&self.settings.tools().cordova)
            .args(["build", "android"])
            .current_dir(self.settings.native_dir());
        if variant == BuildVariant::Release {
            command = command.arg("--release");
        }
        self.build(command).await
    }

    async fn build(&self, command: ToolCommand) -> Result<()> {
        let result = self.runner.run(&command).await?;
        if !result.is_success() {
            return Err(Error::BuildFailed(result.failure(&command)));
        }
        Ok(())
    }

    async fn sign(&self, located: &ArtifactRef, identity: &SigningIdentity) -> Result<ArtifactRef> {
        self.output.section("Signing");
        let signed_dir = locator::signed_dir(&self.settings.build_root(), located.variant());
        tokio::fs::create_dir_all(&signed_dir)
            .await
            .fs_context("creating signed output directory", &signed_dir)?;

        let output = located.terminal_path(&signed_dir);
        Signer::new(self.runner, self.settings.tools())
            .sign_and_align(located, &output, identity)
            .await
    }

    async fn report_artifact(&self, artifact: &ArtifactRef) -> Result<String> {
        let size = tokio::fs::metadata(artifact.path())
            .await
            .fs_context("reading artifact metadata", artifact.path())?
            .len();
        let checksum = calculate_sha256(artifact.path()).await?;

        self.output
            .success(&format!("Artifact ready: {}", artifact.path().display()));
        self.output.indent(&format!("size: {} bytes", size));
        self.output.indent(&format!("sha256: {}", checksum));
        Ok(checksum)
    }

    async fn package_id(&self) -> Option<String> {
        if let Some(id) = self.settings.package_id() {
            return Some(id.to_string());
        }
        match metadata::read_package_id(&self.settings.config_xml()).await {
            Ok(id) => Some(id),
            Err(e) => {
                self.output
                    .warn(&format!("Unknown application identifier, will not launch: {}", e));
                None
            }
        }
    }
}
