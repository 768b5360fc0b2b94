mod common;

use std::{fs, path::Path};

use common::{FakeToolchain, cordova_project, has_arg, outputs, test_identity};
use kodegen_bundler_android::{
    bundler::{
        ArtifactKind, BuildVariant, CommitOutcome, DeliveryChoice, DeliveryOutcome, Error,
        IdentityStore, PipelineOptions, PipelineRun, PipelineState, ReleasePipeline, Result,
        Settings, SettingsBuilder, SigningIdentity, StaticIdentitySource,
    },
    cli::{OutputManager, ScriptedPrompter},
};

fn settings(root: &Path) -> Settings {
    SettingsBuilder::new()
        .project_root(root)
        .identity_file(root.join("keystore_config.json"))
        .build()
        .unwrap()
}

fn unattended(variant: BuildVariant, delivery: DeliveryChoice) -> PipelineOptions {
    PipelineOptions {
        variant: Some(variant),
        delivery: Some(delivery),
        skip_commit: true,
        assume_yes: true,
        ..Default::default()
    }
}

async fn run_pipeline(
    settings: &Settings,
    fake: &FakeToolchain,
    prompter: &mut ScriptedPrompter,
    options: &PipelineOptions,
    identity: Option<SigningIdentity>,
) -> (PipelineRun, Result<()>) {
    let output = OutputManager::plain(false, true);
    let mut run = PipelineRun::new();
    let mut pipeline = ReleasePipeline::new(settings, fake, prompter, &output);
    if let Some(identity) = identity {
        pipeline = pipeline.with_identity_source(Box::new(StaticIdentitySource(identity)));
    }
    let result = pipeline.run(options, &mut run).await;
    (run, result)
}

#[tokio::test]
async fn debug_apk_is_installed_without_signing() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let apk = outputs(dir.path(), "apk", "debug").join("app-debug.apk");
    let fake = FakeToolchain::new().produces(&apk);
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

    let options = unattended(BuildVariant::Debug, DeliveryChoice::Install);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;
    result.unwrap();

    assert_eq!(run.state(), PipelineState::Done);
    assert_eq!(
        run.history(),
        &[
            PipelineState::Start,
            PipelineState::VariantChosen,
            PipelineState::WebAssetsBuilt,
            PipelineState::NativeBuilt,
            PipelineState::ArtifactLocated,
            PipelineState::Unsigned,
            PipelineState::Delivered,
            PipelineState::Done,
        ]
    );
    let terminal = run.terminal().unwrap();
    assert_eq!(terminal.path(), apk);
    assert_eq!(terminal.kind(), ArtifactKind::InstallablePackage);
    assert_eq!(run.checksum().map(str::len), Some(64));
    assert_eq!(
        run.delivered(),
        Some(&DeliveryOutcome::Installed { launched: true })
    );

    assert_eq!(fake.programs(), ["npm", "cordova", "adb", "adb"]);
    let calls = fake.calls();
    assert_eq!(calls[1].args, ["build", "android"]);
    assert_eq!(calls[1].cwd.as_deref(), Some(settings.native_dir()));
    assert_eq!(calls[2].args[..2], ["install", "-r"]);
    assert!(has_arg(&calls[3], "com.example.budget"));
    assert!(prompter.asked().is_empty());
    // no identity needed for debug
    assert!(!settings.identity_file().exists());
}

#[tokio::test]
async fn release_bundle_is_converted_to_universal_apk() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let aab = outputs(dir.path(), "bundle", "release").join("app-release.aab");
    let fake = FakeToolchain::new().produces(&aab);
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Release, DeliveryChoice::OpenFolder);
    let identity = test_identity(dir.path());
    let (run, result) =
        run_pipeline(&settings, &fake, &mut prompter, &options, Some(identity.clone())).await;
    result.unwrap();

    assert_eq!(run.state(), PipelineState::Done);
    assert!(run.history().contains(&PipelineState::Signed));
    assert_eq!(
        run.intermediate().unwrap().kind(),
        ArtifactKind::DistributableBundle
    );

    let expected = settings
        .build_root()
        .join("signed/release/app-release.apk");
    let terminal = run.terminal().unwrap();
    assert_eq!(terminal.path(), expected);
    assert_eq!(terminal.kind(), ArtifactKind::InstallablePackage);
    assert_eq!(fs::read(&expected).unwrap(), b"universal package");

    assert!(fake.ran("bundletool"));
    assert!(!fake.ran("jarsigner"));
    assert!(!fake.ran("zipalign"));
    assert!(has_arg(&fake.calls()[1], "--release"));
    assert_eq!(
        run.delivered(),
        Some(&DeliveryOutcome::FolderOpened { opened: true })
    );

    // The obtained identity was persisted for the next run
    let stored = IdentityStore::new(settings.identity_file())
        .load()
        .await
        .unwrap();
    assert_eq!(stored, Some(identity));
}

#[tokio::test]
async fn corrupted_identity_fails_before_any_tool_runs() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let settings = settings(dir.path());
    fs::write(
        settings.identity_file(),
        r#"{"keystore_path": "/keys/release.keystore", "ali"#,
    )
    .unwrap();
    let fake = FakeToolchain::new()
        .produces(outputs(dir.path(), "apk", "release").join("app-release-unsigned.apk"));
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Release, DeliveryChoice::Install);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::MalformedIdentity { .. }), "{err}");
    assert_eq!(err.exit_code(), 13);
    assert!(fake.calls().is_empty());
    assert_eq!(run.state(), PipelineState::Aborted);
    assert!(prompter.asked().is_empty());
}

#[tokio::test]
async fn release_apk_is_signed_aligned_and_rerunnable() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let unsigned = outputs(dir.path(), "apk", "release").join("app-release-unsigned.apk");
    let settings = settings(dir.path());
    IdentityStore::new(settings.identity_file())
        .persist(&test_identity(dir.path()))
        .await
        .unwrap();
    let options = unattended(BuildVariant::Release, DeliveryChoice::Install);

    for _ in 0..2 {
        let fake = FakeToolchain::new().produces(&unsigned);
        let mut prompter = ScriptedPrompter::default();
        let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;
        result.unwrap();

        assert_eq!(run.intermediate().unwrap().path(), unsigned);
        assert_eq!(
            run.terminal().unwrap().path(),
            settings.build_root().join("signed/release/app-release.apk")
        );
        assert_eq!(
            fake.programs(),
            ["npm", "cordova", "jarsigner", "zipalign", "adb", "adb"]
        );
    }
}

#[tokio::test]
async fn interactive_answers_drive_commit_variant_and_delivery() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let apk = outputs(dir.path(), "apk", "debug").join("app-debug.apk");
    let fake = FakeToolchain::new()
        .produces(&apk)
        .git_status(" M src/app.js\n");
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::new(["Bump version", "y", "1", "open"]);

    let (run, result) = run_pipeline(
        &settings,
        &fake,
        &mut prompter,
        &PipelineOptions::default(),
        None,
    )
    .await;
    result.unwrap();

    assert_eq!(
        run.commit(),
        &CommitOutcome::Committed("Bump version".to_string())
    );
    assert_eq!(run.variant(), Some(BuildVariant::Debug));
    assert_eq!(run.delivery(), Some(DeliveryChoice::OpenFolder));
    assert_eq!(prompter.asked().len(), 4);

    let git: Vec<_> = fake
        .calls()
        .into_iter()
        .filter(|c| c.program == "git")
        .map(|c| c.args)
        .collect();
    assert_eq!(
        git,
        [
            vec!["add", "."],
            vec!["status", "--porcelain"],
            vec!["commit", "-m", "Bump version"],
        ]
    );
}

#[tokio::test]
async fn clean_tree_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let fake = FakeToolchain::new()
        .produces(outputs(dir.path(), "apk", "debug").join("app-debug.apk"));
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();
    let options = PipelineOptions {
        commit_message: Some("Nothing changed".to_string()),
        skip_commit: false,
        ..unattended(BuildVariant::Debug, DeliveryChoice::OpenFolder)
    };

    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;
    result.unwrap();

    assert_eq!(run.commit(), &CommitOutcome::NothingToCommit);
    assert!(
        !fake
            .calls()
            .iter()
            .any(|c| c.program == "git" && has_arg(c, "commit"))
    );
}

#[tokio::test]
async fn declining_builds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let fake = FakeToolchain::new();
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::new(["", "n"]);

    let (run, result) = run_pipeline(
        &settings,
        &fake,
        &mut prompter,
        &PipelineOptions::default(),
        None,
    )
    .await;
    result.unwrap();

    assert!(run.declined());
    assert_eq!(run.state(), PipelineState::Start);
    assert_eq!(run.commit(), &CommitOutcome::Skipped);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn unknown_variant_answer_aborts() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let fake = FakeToolchain::new();
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::new(["beta"]);
    let options = PipelineOptions {
        skip_commit: true,
        assume_yes: true,
        ..Default::default()
    };

    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::InvalidVariant { ref input } if input == "beta"));
    assert_eq!(err.exit_code(), 19);
    assert_eq!(run.state(), PipelineState::Aborted);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn failed_install_keeps_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let apk = outputs(dir.path(), "apk", "debug").join("app-debug.apk");
    let fake = FakeToolchain::new()
        .produces(&apk)
        .install_stdout("Performing Streamed Install\nFailure [INSTALL_FAILED_UPDATE_INCOMPATIBLE]");
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Debug, DeliveryChoice::Install);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::InstallFailed(_)));
    assert_eq!(err.exit_code(), 18);
    assert_eq!(run.state(), PipelineState::Aborted);
    assert_eq!(run.terminal().unwrap().path(), apk);
    assert!(apk.exists());
    // no launch after a failed install
    assert_eq!(fake.programs().iter().filter(|p| *p == "adb").count(), 1);
}

#[tokio::test]
async fn debug_bundle_is_not_sent_to_the_device() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let aab = outputs(dir.path(), "bundle", "debug").join("app-debug.aab");
    let fake = FakeToolchain::new().produces(&aab);
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Debug, DeliveryChoice::Install);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::BundleNotInstallable(ref path) if *path == aab));
    assert_eq!(err.exit_code(), 25);
    assert_eq!(run.state(), PipelineState::Aborted);
    assert_eq!(
        run.terminal().unwrap().kind(),
        ArtifactKind::DistributableBundle
    );
    assert!(!fake.ran("adb"));
    assert!(!fake.ran("bundletool"));
}

#[tokio::test]
async fn debug_bundle_can_still_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let aab = outputs(dir.path(), "bundle", "debug").join("app-debug.aab");
    let fake = FakeToolchain::new().produces(&aab);
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Debug, DeliveryChoice::OpenFolder);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;
    result.unwrap();

    assert_eq!(run.state(), PipelineState::Done);
    assert_eq!(run.terminal().unwrap().path(), aab);
    assert!(!fake.ran("adb"));
}

#[tokio::test]
async fn failed_web_build_stops_before_native_build() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let fake = FakeToolchain::new().failing("npm");
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Debug, DeliveryChoice::Install);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::BuildFailed(_)));
    assert_eq!(run.history().last(), Some(&PipelineState::Aborted));
    assert_eq!(fake.programs(), ["npm"]);
}

#[tokio::test]
async fn missing_artifact_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let fake = FakeToolchain::new();
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Debug, DeliveryChoice::Install);
    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    assert!(matches!(result, Err(Error::ArtifactNotFound { .. })));
    assert!(run.intermediate().is_none());
}

#[tokio::test]
async fn no_launch_skips_package_lookup_and_launch() {
    let dir = tempfile::tempdir().unwrap();
    cordova_project(dir.path());
    let fake = FakeToolchain::new()
        .produces(outputs(dir.path(), "apk", "debug").join("app-debug.apk"));
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();
    let options = PipelineOptions {
        launch: false,
        ..unattended(BuildVariant::Debug, DeliveryChoice::Install)
    };

    let (run, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;
    result.unwrap();

    assert_eq!(
        run.delivered(),
        Some(&DeliveryOutcome::Installed { launched: false })
    );
    assert_eq!(fake.programs(), ["npm", "cordova", "adb"]);
}

#[tokio::test]
async fn missing_native_project_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeToolchain::new();
    let settings = settings(dir.path());
    let mut prompter = ScriptedPrompter::default();

    let options = unattended(BuildVariant::Debug, DeliveryChoice::Install);
    let (_, result) = run_pipeline(&settings, &fake, &mut prompter, &options, None).await;

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 24);
}
