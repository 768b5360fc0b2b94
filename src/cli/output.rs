//! Colored operator output.
//!
//! All writes here are decorative: a closed or redirected terminal must not
//! abort a release, so write errors are swallowed.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Terminal output manager for progress, success, warning and error lines.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color: ColorChoice,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `quiet` suppresses everything except warnings and errors.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            color: ColorChoice::Auto,
        }
    }

    /// Output manager that never writes colors.
    pub fn plain(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            color: ColorChoice::Never,
        }
    }

    /// Whether tool output is echoed.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Detail line, only in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.is_verbose() {
            self.write_stdout(None, false, message);
        }
    }

    /// Progress line for a step that is starting.
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            self.write_stdout(Some(Color::Cyan), false, message);
        }
    }

    /// Success line.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.write_stdout(Some(Color::Green), false, &format!("✓ {}", message));
        }
    }

    /// Warning line, shown even in quiet mode.
    pub fn warn(&self, message: &str) {
        self.write_stderr(Some(Color::Yellow), &format!("warning: {}", message));
    }

    /// Error line, shown even in quiet mode.
    pub fn error(&self, message: &str) {
        self.write_stderr(Some(Color::Red), &format!("error: {}", message));
    }

    /// Bold section header.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.write_stdout(None, true, "");
            self.write_stdout(Some(Color::White), true, title);
        }
    }

    /// Indented text, used for streamed tool output.
    pub fn indent(&self, message: &str) {
        if self.is_verbose() {
            self.write_stdout(None, false, &format!("    {}", message));
        }
    }

    /// Prompt text without a trailing newline.
    pub fn prompt(&self, message: &str) {
        let mut stream = StandardStream::stdout(self.color);
        let _ = stream.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true));
        let _ = write!(stream, "{}", message);
        let _ = stream.reset();
        let _ = stream.flush();
    }

    fn write_stdout(&self, color: Option<Color>, bold: bool, message: &str) {
        let mut stream = StandardStream::stdout(self.color);
        let _ = stream.set_color(ColorSpec::new().set_fg(color).set_bold(bold));
        let _ = writeln!(stream, "{}", message);
        let _ = stream.reset();
    }

    fn write_stderr(&self, color: Option<Color>, message: &str) {
        let mut stream = StandardStream::stderr(self.color);
        let _ = stream.set_color(ColorSpec::new().set_fg(color).set_bold(true));
        let _ = writeln!(stream, "{}", message);
        let _ = stream.reset();
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(true, false)
    }
}
