//! External tool command descriptions.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::bundler::error::{FAILURE_TAIL_LINES, ToolFailure};

/// A configured external program plus any leading arguments.
///
/// `java -jar /opt/bundletool.jar` is program `java` with leading arguments
/// `-jar /opt/bundletool.jar`. Deserializes from a command line string or
/// from an argument array, which keeps whitespace inside paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ToolSpecRepr")]
pub struct ToolSpec {
    /// Program name or path
    pub program: String,
    /// Arguments placed before every invocation's own arguments
    pub leading_args: Vec<String>,
}

impl ToolSpec {
    /// A bare program with no leading arguments.
    pub fn program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Splits a command line on whitespace.
    pub fn parse(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            leading_args: parts.collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolSpecRepr {
    Line(String),
    Argv(Vec<String>),
}

impl TryFrom<ToolSpecRepr> for ToolSpec {
    type Error = String;

    fn try_from(repr: ToolSpecRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ToolSpecRepr::Line(line) => Ok(Self::parse(&line)),
            ToolSpecRepr::Argv(argv) => {
                let mut parts = argv.into_iter();
                match parts.next() {
                    Some(program) if !program.trim().is_empty() => Ok(Self {
                        program,
                        leading_args: parts.collect(),
                    }),
                    _ => Err("tool command array must start with a program".to_string()),
                }
            }
        }
    }
}

/// One invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program to execute
    pub program: String,
    /// Full argument list, leading arguments included
    pub args: Vec<String>,
    /// Working directory, inherited when `None`
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    /// Starts a command from a configured tool.
    pub fn new(spec: &ToolSpec) -> Self {
        Self {
            program: spec.program.clone(),
            args: spec.leading_args.clone(),
            cwd: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends a path argument.
    pub fn arg_path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl ToolOutput {
    /// A zero exit with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A non-zero exit with the given stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Exit code zero.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Describes this output as a failure of `command`.
    pub fn failure(&self, command: &ToolCommand) -> ToolFailure {
        let mut output = tail(&self.stderr, FAILURE_TAIL_LINES);
        if output.trim().is_empty() {
            output = tail(&self.stdout, FAILURE_TAIL_LINES);
        }
        ToolFailure {
            command: command.to_string(),
            code: self.code,
            output,
        }
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
