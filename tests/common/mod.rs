//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use kodegen_bundler_android::bundler::{
    Result, SigningIdentity, ToolCommand, ToolOutput, ToolRunner,
};

/// Stands in for the Android toolchain.
///
/// Records every command and simulates each tool's effect on disk:
/// `cordova` writes the configured artifacts, `zipalign` copies its input to
/// its output, `bundletool` writes an APK set holding one `universal.apk`.
#[derive(Default)]
pub struct FakeToolchain {
    calls: Mutex<Vec<ToolCommand>>,
    produces: Vec<PathBuf>,
    failing: Vec<String>,
    git_status: String,
    install_stdout: String,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// `cordova build` writes `path`.
    pub fn produces(mut self, path: impl Into<PathBuf>) -> Self {
        self.produces.push(path.into());
        self
    }

    /// `program` exits 1.
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.to_string());
        self
    }

    /// Output of `git status --porcelain`.
    pub fn git_status(mut self, status: &str) -> Self {
        self.git_status = status.to_string();
        self
    }

    /// Stdout of `adb install`.
    pub fn install_stdout(mut self, stdout: &str) -> Self {
        self.install_stdout = stdout.to_string();
        self
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }

    pub fn ran(&self, program: &str) -> bool {
        self.calls().iter().any(|c| c.program == program)
    }

    fn simulate(&self, command: &ToolCommand) -> ToolOutput {
        let args = &command.args;
        match command.program.as_str() {
            "cordova" => {
                for path in &self.produces {
                    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                    std::fs::write(path, b"native build output").unwrap();
                }
                ToolOutput::success("BUILD SUCCESSFUL")
            }
            "zipalign" => {
                let input = &args[args.len() - 2];
                let output = &args[args.len() - 1];
                std::fs::copy(input, output).unwrap();
                ToolOutput::success("")
            }
            "bundletool" => {
                let container = args
                    .iter()
                    .find_map(|a| a.strip_prefix("--output="))
                    .unwrap();
                write_apk_set(Path::new(container));
                ToolOutput::success("")
            }
            "git" if args.first().map(String::as_str) == Some("status") => {
                ToolOutput::success(self.git_status.clone())
            }
            "adb" if args.first().map(String::as_str) == Some("install") => {
                ToolOutput::success(self.install_stdout.clone())
            }
            _ => ToolOutput::success(""),
        }
    }
}

#[async_trait]
impl ToolRunner for FakeToolchain {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(command.clone());
        if self.failing.contains(&command.program) {
            return Ok(ToolOutput::failed(1, format!("{} exploded", command.program)));
        }
        Ok(self.simulate(command))
    }
}

/// Whether `arg` appears anywhere in `command`'s argument list.
pub fn has_arg(command: &ToolCommand, arg: &str) -> bool {
    command.args.iter().any(|a| a == arg)
}

/// Writes an APK set the way `build-apks --mode=universal` does.
pub fn write_apk_set(path: &Path) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    zip.start_file("toc.pb", options).unwrap();
    zip.write_all(b"table of contents").unwrap();
    zip.start_file("universal.apk", options).unwrap();
    zip.write_all(b"universal package").unwrap();
    zip.finish().unwrap();
}

/// Identity whose keystore never has to exist; the fake tools don't read it.
pub fn test_identity(dir: &Path) -> SigningIdentity {
    SigningIdentity::new(
        dir.join("release.keystore"),
        "upload",
        "store-secret",
        "key-secret",
    )
}

/// Cordova project skeleton under `root`.
pub fn cordova_project(root: &Path) {
    std::fs::create_dir_all(root.join("cordova")).unwrap();
    std::fs::write(root.join("package.json"), "{}").unwrap();
    std::fs::write(
        root.join("cordova/config.xml"),
        r#"<?xml version='1.0' encoding='utf-8'?>
<widget id="com.example.budget" version="1.0.0" xmlns="http://www.w3.org/ns/widgets">
    <name>Budget</name>
</widget>
"#,
    )
    .unwrap();
}

/// Build output directory for `segment` (`apk` or `bundle`) and `variant`.
pub fn outputs(root: &Path, segment: &str, variant: &str) -> PathBuf {
    root.join("cordova/platforms/android/app/build/outputs")
        .join(segment)
        .join(variant)
}
