//! `deploy` subcommand: the release pipeline.

use std::time::Duration;

use crate::{
    bundler::{
        ConfigFile, DeliveryOutcome, PipelineRun, ProcessRunner, ReleasePipeline, Settings,
        SettingsBuilder, settings::DEFAULT_CONFIG_FILE,
    },
    cli::{RuntimeConfig, StdinPrompter, args::DeployArgs},
    error::{CliError, Result},
};

/// Runs the release pipeline with answers from `args`, asking for the rest.
pub async fn execute(args: DeployArgs, config: &RuntimeConfig) -> Result<i32> {
    let output = config.output();
    let options = args.pipeline_options()?;
    let settings = load_settings(&args).await?;
    log::debug!("Settings: {:?}", settings);

    let runner = ProcessRunner::new(output.clone(), settings.tool_timeout());
    let mut prompter = StdinPrompter::new(output.clone());
    let mut run = PipelineRun::new();

    let result = ReleasePipeline::new(&settings, &runner, &mut prompter, output)
        .run(&options, &mut run)
        .await;

    if let Err(e) = result {
        if let Some(artifact) = run.terminal() {
            output.warn(&format!(
                "Artifact is still available at {}",
                artifact.path().display()
            ));
        }
        return Err(e.into());
    }

    if run.declined() {
        return Ok(0);
    }

    match run.delivered() {
        Some(DeliveryOutcome::Installed { launched: false }) if options.launch => {
            output.warn("Installed, but the app was not launched");
        }
        Some(DeliveryOutcome::FolderOpened { opened: false }) => {
            if let Some(artifact) = run.terminal() {
                output.warn(&format!(
                    "Open {} manually to share the artifact",
                    artifact.directory().display()
                ));
            }
        }
        _ => {}
    }
    Ok(0)
}

async fn load_settings(args: &DeployArgs) -> Result<Settings> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.project.join(DEFAULT_CONFIG_FILE));
    let config_file = ConfigFile::load(&config_path).await?;
    if config_file.is_none() && args.config.is_some() {
        return Err(CliError::InvalidArguments {
            reason: format!("config file not found: {}", config_path.display()),
        }
        .into());
    }

    let mut builder = SettingsBuilder::new().project_root(&args.project);
    if let Some(path) = &args.identity_file {
        builder = builder.identity_file(path);
    }
    if let Some(id) = &args.package_id {
        builder = builder.package_id(id);
    }
    if let Some(secs) = args.tool_timeout {
        builder = builder.tool_timeout(Duration::from_secs(secs));
    }
    if let Some(file) = config_file {
        builder = builder.config_file(file);
    }
    Ok(builder.build()?)
}
