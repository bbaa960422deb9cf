//! Scripted command runner
//!
//! Replays canned results for command lines and records every call.
//! Used to drive the adb and openssl adapters without the real tools.

use std::sync::Mutex;

use crate::domain::ports::{display_command, CommandRunner, ProcessError};
use crate::domain::value_objects::CommandResult;

struct Rule {
    pattern: String,
    result: Result<CommandResult, ProcessError>,
    remaining: Option<usize>,
}

/// Runner answering from a list of rules.
///
/// The first rule whose pattern is a substring of the rendered command
/// line wins. `once` rules are used up after one match; unmatched
/// commands succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every matching command with `result`
    pub fn on(self, pattern: &str, result: CommandResult) -> Self {
        self.push(pattern, Ok(result), None)
    }

    /// Answer the next matching command with `result`
    pub fn once(self, pattern: &str, result: CommandResult) -> Self {
        self.push(pattern, Ok(result), Some(1))
    }

    /// Fail every matching command at the process level
    pub fn fail(self, pattern: &str, error: ProcessError) -> Self {
        self.push(pattern, Err(error), None)
    }

    fn push(self, pattern: &str, result: Result<CommandResult, ProcessError>, remaining: Option<usize>) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(Rule {
                pattern: pattern.to_string(),
                result,
                remaining,
            });
        }
        self
    }

    /// Rendered command lines, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn was_called(&self, pattern: &str) -> bool {
        self.calls().iter().any(|c| c.contains(pattern))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, ProcessError> {
        let line = display_command(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }

        let mut rules = match self.rules.lock() {
            Ok(rules) => rules,
            Err(_) => return Ok(CommandResult::ok("")),
        };
        let rule = rules
            .iter_mut()
            .find(|r| r.remaining != Some(0) && line.contains(&r.pattern));
        match rule {
            Some(rule) => {
                if let Some(n) = rule.remaining.as_mut() {
                    *n -= 1;
                }
                rule.result.clone()
            }
            None => Ok(CommandResult::ok("")),
        }
    }
}
