use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_android").unwrap();
    cmd.env_remove("KODEGEN_ANDROID_PROJECT")
        .env_remove("KODEGEN_ANDROID_IDENTITY")
        .env_remove("KODEGEN_ANDROID_TOOL_TIMEOUT");
    cmd
}

#[test]
fn help_lists_subcommands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("snapshot"));
}

#[test]
fn deploy_outside_a_cordova_project_exits_24() {
    let dir = tempfile::tempdir().unwrap();

    bin()
        .current_dir(dir.path())
        .args(["deploy", "--variant", "debug", "--delivery", "open"])
        .args(["--skip-commit", "--yes"])
        .assert()
        .code(24)
        .stderr(predicate::str::contains("native project directory not found"));
}

#[test]
fn unknown_variant_flag_exits_19() {
    let dir = tempfile::tempdir().unwrap();

    bin()
        .current_dir(dir.path())
        .args(["--variant", "beta", "--skip-commit", "--yes"])
        .assert()
        .code(19)
        .stderr(predicate::str::contains("invalid build variant 'beta'"));
}

#[test]
fn unknown_delivery_flag_exits_20() {
    let dir = tempfile::tempdir().unwrap();

    bin()
        .current_dir(dir.path())
        .args(["--variant", "debug", "--delivery", "email"])
        .assert()
        .code(20);
}

#[test]
fn conflicting_commit_flags_are_misuse() {
    bin()
        .args(["deploy", "--skip-commit", "-m", "release notes"])
        .assert()
        .code(2);
}

#[test]
fn explicit_missing_config_is_misuse() {
    let dir = tempfile::tempdir().unwrap();

    bin()
        .current_dir(dir.path())
        .args(["--config", "missing.toml", "--skip-commit", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn snapshot_writes_nested_json() {
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("app");
    fs::create_dir_all(app.join("src")).unwrap();
    fs::create_dir_all(app.join("node_modules/left-pad")).unwrap();
    fs::write(app.join("src/index.js"), "export default 1;\n").unwrap();
    fs::write(app.join("notes.txt"), "todo").unwrap();
    let output = dir.path().join("tree.json");

    bin()
        .arg("snapshot")
        .arg(&app)
        .arg("--output")
        .arg(&output)
        .args(["--ignore", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory structure saved"));

    let text = fs::read_to_string(&output).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(tree["src"]["index.js"], "export default 1;\n");
    assert!(tree.get("node_modules").is_none());
    assert!(tree.get("notes.txt").is_none());
    assert!(text.contains("\n    \"src\""));
}

#[test]
fn snapshot_rejects_path_ignores() {
    let dir = tempfile::tempdir().unwrap();

    bin()
        .arg("snapshot")
        .arg(dir.path())
        .args(["--ignore", "src/vendor"])
        .assert()
        .code(2);
}

#[test]
fn snapshot_of_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();

    bin()
        .current_dir(dir.path())
        .args(["snapshot", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
