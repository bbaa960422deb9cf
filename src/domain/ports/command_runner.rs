//! Command Runner Port
//!
//! Runs one external program and captures its output. The real
//! implementation spawns subprocesses; tests script the responses.

use std::fmt;

use crate::domain::value_objects::CommandResult;

/// Failure to run a command at all (as opposed to a nonzero exit)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Executable not found on PATH or at the configured location
    NotFound { program: String },
    /// Killed after exceeding the runner's timeout
    Timeout { command: String, secs: u64 },
    /// Spawn or pipe failure
    Io { command: String, message: String },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { program } => write!(f, "{}: executable not found", program),
            Self::Timeout { command, secs } => {
                write!(f, "'{}' timed out after {}s", command, secs)
            }
            Self::Io { command, message } => write!(f, "'{}': {}", command, message),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Trait for running external programs
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, waiting for it to exit
    fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, ProcessError>;
}

/// Render a command line for logs and error messages
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}
