//! Command Result value object
//!
//! Outcome of one external invocation (bridge or toolkit).

/// Exit status and captured output of one external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl CommandResult {
    pub fn new(exit_code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Successful result with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(Some(0), stdout, "")
    }

    /// Failed result with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self::new(Some(code), "", stderr)
    }

    /// `None` when the process was killed by a signal
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// First non-empty stdout line, trimmed
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    /// stdout and stderr joined, for substring checks on tools that
    /// report refusals on either stream
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, _) => self.stderr.trim().to_string(),
            (false, true) => self.stdout.trim().to_string(),
            (false, false) => format!("{}\n{}", self.stdout.trim(), self.stderr.trim()),
        }
    }

    /// One-line description for error messages
    pub fn describe(&self) -> String {
        let code = self
            .exit_code
            .map(|c| format!("exit code {}", c))
            .unwrap_or_else(|| "terminated by signal".to_string());
        let output = self.combined();
        match output.lines().last() {
            Some(line) if !line.trim().is_empty() => format!("{}: {}", code, line.trim()),
            _ => code,
        }
    }
}
