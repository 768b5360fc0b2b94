//! Blocking-in-sequence execution of external tools.

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};

use super::{
    command::{ToolCommand, ToolOutput},
    tool_detection::resolve_program,
};
use crate::{
    bundler::error::{Error, ErrorExt, Result},
    cli::OutputManager,
};

/// Grace period for a killed tool to exit after a timeout.
const KILL_GRACE: Duration = Duration::from_secs(10);

/// Executes external tools.
///
/// A non-zero exit is not an error at this layer: callers map it onto the
/// failure variant for their step. `Err` means the tool could not be run at
/// all (missing program, spawn failure, timeout).
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Runs `command` to completion and returns its captured output.
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs tools as child processes.
///
/// Stdout is streamed to the operator line by line while being captured;
/// stderr is captured for failure reports.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    output: OutputManager,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Creates a runner. `timeout: None` waits indefinitely.
    pub fn new(output: OutputManager, timeout: Option<Duration>) -> Self {
        Self { output, timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let program = resolve_program(&command.program)?;
        log::debug!("Running: {}", command);

        let mut process = Command::new(&program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.cwd {
            process.current_dir(dir);
        }

        let mut child = process
            .spawn()
            .fs_context("spawning tool", &program)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let output = &self.output;

        let run = async {
            // Both streams must reach EOF before the exit status is read
            let (stdout_lines, stderr_lines) = tokio::join!(
                pump_lines(stdout, Some(output)),
                pump_lines(stderr, None)
            );
            let status = child.wait().await;
            (stdout_lines, stderr_lines, status)
        };

        let finished = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.ok(),
            None => Some(run.await),
        };

        let Some((stdout_lines, stderr_lines, status)) = finished else {
            let seconds = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            self.output.warn(&format!(
                "{} timed out after {}s, terminating...",
                command.program, seconds
            ));
            if let Err(e) = child.kill().await {
                log::warn!("Failed to kill {}: {}", command.program, e);
            }
            let _ = tokio::time::timeout(KILL_GRACE, child.wait()).await;
            return Err(Error::ToolTimedOut {
                command: command.to_string(),
                seconds,
            });
        };

        let status = status.fs_context("waiting for tool", &program)?;
        log::debug!("{} finished with {:?}", command.program, status.code());

        Ok(ToolOutput {
            code: status.code(),
            stdout: stdout_lines.join("\n"),
            stderr: stderr_lines.join("\n"),
        })
    }
}

async fn pump_lines<R>(stream: Option<R>, echo: Option<&OutputManager>) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let Some(stream) = stream else {
        return captured;
    };

    // Raw lines keep the pipe drained to EOF even when the tool emits
    // bytes that are not UTF-8
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("Stopped reading tool output: {}", e);
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        if let Some(output) = echo {
            output.indent(&line);
        }
        captured.push(line);
    }
    captured
}
