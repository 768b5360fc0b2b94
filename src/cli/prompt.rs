//! Interactive operator prompts.

use std::io::{self, BufRead};

use super::OutputManager;

/// Source of operator answers.
pub trait Prompter {
    /// Asks `question` and returns the trimmed answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Asks for a secret value. Defaults to [`Prompter::ask`].
    fn ask_secret(&mut self, question: &str) -> io::Result<String> {
        self.ask(question)
    }
}

/// Reads answers from standard input.
#[derive(Debug, Clone)]
pub struct StdinPrompter {
    output: OutputManager,
}

impl StdinPrompter {
    /// Prompter printing questions through `output`.
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }
}

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.output.prompt(question);

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed while waiting for an answer",
            ));
        }
        Ok(input.trim().to_string())
    }
}

/// Answers from a fixed list, in order. Used when running unattended.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Prompter that replays `answers`.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("no scripted answer for '{}'", question.trim()),
                )
            })
    }
}
