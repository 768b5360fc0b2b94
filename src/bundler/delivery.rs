//! Handing the terminal artifact to a device or to the operator.
//!
//! Install always attempts a launch afterwards when the application
//! identifier is known, whatever the variant. Only installable packages go to
//! the device; an unconverted bundle is refused with
//! [`Error::BundleNotInstallable`]. Otherwise only the install itself can
//! fail the run. A failed launch or folder open is a warning, since the
//! artifact is already on disk.

use std::{fmt, path::Path, str::FromStr};

use super::{
    artifact::{ArtifactKind, ArtifactRef},
    error::{Error, Result},
    settings::ToolSettings,
    tools::{ToolCommand, ToolRunner},
};

/// How the terminal artifact is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChoice {
    /// Install on the attached device, then launch
    Install,
    /// Open the artifact's folder for manual distribution
    OpenFolder,
}

impl FromStr for DeliveryChoice {
    type Err = Error;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "install" | "i" | "device" | "1" => Ok(DeliveryChoice::Install),
            "open" | "o" | "folder" | "share" | "2" => Ok(DeliveryChoice::OpenFolder),
            _ => Err(Error::InvalidDeliveryChoice {
                input: input.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for DeliveryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryChoice::Install => f.write_str("install"),
            DeliveryChoice::OpenFolder => f.write_str("open"),
        }
    }
}

/// What delivery achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Installed on the device
    Installed {
        /// Whether the launch also succeeded
        launched: bool,
    },
    /// Folder handed to the platform opener
    FolderOpened {
        /// Whether the opener succeeded
        opened: bool,
    },
}

/// Runs the device and folder collaborators.
pub struct Delivery<'a> {
    runner: &'a dyn ToolRunner,
    tools: &'a ToolSettings,
}

impl<'a> Delivery<'a> {
    /// Delivery using the tools configured in `tools`.
    pub fn new(runner: &'a dyn ToolRunner, tools: &'a ToolSettings) -> Self {
        Self { runner, tools }
    }

    /// Delivers `artifact` as chosen. `package_id: None` skips the launch.
    pub async fn deliver(
        &self,
        artifact: &ArtifactRef,
        choice: DeliveryChoice,
        package_id: Option<&str>,
    ) -> Result<DeliveryOutcome> {
        match choice {
            DeliveryChoice::Install => {
                if artifact.kind() == ArtifactKind::DistributableBundle {
                    return Err(Error::BundleNotInstallable(artifact.path().to_path_buf()));
                }
                self.install(artifact.path()).await?;
                let launched = match package_id {
                    Some(id) => self.launch(id).await?,
                    None => {
                        log::info!("Skipping launch");
                        false
                    }
                };
                Ok(DeliveryOutcome::Installed { launched })
            }
            DeliveryChoice::OpenFolder => {
                let opened = self.open_folder(artifact.directory()).await?;
                Ok(DeliveryOutcome::FolderOpened { opened })
            }
        }
    }

    /// Installs (or reinstalls) `package` on the attached device.
    pub async fn install(&self, package: &Path) -> Result<()> {
        log::info!("Installing {}", package.display());
        let command = ToolCommand::new(&self.tools.adb)
            .args(["install", "-r"])
            .arg_path(package);

        let result = self.runner.run(&command).await?;
        // adb reports some install failures on stdout with a zero exit
        if !result.is_success() || result.stdout.contains("Failure [") {
            return Err(Error::InstallFailed(result.failure(&command)));
        }
        Ok(())
    }

    /// Starts the launcher activity of `package_id`. Returns whether it started.
    pub async fn launch(&self, package_id: &str) -> Result<bool> {
        log::info!("Launching {}", package_id);
        let command = ToolCommand::new(&self.tools.adb)
            .args(["shell", "monkey", "-p", package_id])
            .args(["-c", "android.intent.category.LAUNCHER", "1"]);

        let result = self.runner.run(&command).await?;
        if !result.is_success() {
            log::warn!("Launch failed: {}", result.failure(&command));
            return Ok(false);
        }
        Ok(true)
    }

    /// Opens `dir` in the platform file browser. Returns whether it opened.
    pub async fn open_folder(&self, dir: &Path) -> Result<bool> {
        log::info!("Opening {}", dir.display());
        let command = ToolCommand::new(&self.tools.opener).arg_path(dir);

        match self.runner.run(&command).await {
            // explorer.exe exits 1 even when it opened the window
            Ok(result) if result.is_success() || cfg!(target_os = "windows") => Ok(true),
            Ok(result) => {
                log::warn!("Could not open folder: {}", result.failure(&command));
                Ok(false)
            }
            Err(e @ (Error::ToolNotFound { .. } | Error::ToolTimedOut { .. })) => {
                log::warn!("Could not open folder: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{
        artifact::BuildVariant,
        tools::{ToolCommand, ToolOutput},
    };

    struct Unreachable;

    #[async_trait::async_trait]
    impl ToolRunner for Unreachable {
        async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
            panic!("no tool should run, got {}", command);
        }
    }

    #[tokio::test]
    async fn refuses_to_install_a_bundle() {
        let tools = ToolSettings::default();
        let bundle = ArtifactRef::new(
            "bundle/debug/app-debug.aab",
            ArtifactKind::DistributableBundle,
            BuildVariant::Debug,
        );

        let err = Delivery::new(&Unreachable, &tools)
            .deliver(&bundle, DeliveryChoice::Install, Some("com.example.app"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BundleNotInstallable(_)));
        assert_eq!(err.exit_code(), 25);
    }

    #[test]
    fn parses_delivery_choices() {
        assert_eq!("install".parse::<DeliveryChoice>().unwrap(), DeliveryChoice::Install);
        assert_eq!(" 2 ".parse::<DeliveryChoice>().unwrap(), DeliveryChoice::OpenFolder);
        assert!(matches!(
            "email".parse::<DeliveryChoice>(),
            Err(Error::InvalidDeliveryChoice { .. })
        ));
    }
}
