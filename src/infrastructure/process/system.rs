//! Subprocess runner
//!
//! Spawns the program with piped output, drains both pipes on helper
//! threads and polls for exit until the timeout, then kills the child.

use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::ports::{display_command, CommandRunner, ProcessError};
use crate::domain::value_objects::CommandResult;

/// Default per-invocation timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: timeout.max(Duration::from_secs(1)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, ProcessError> {
        let line = display_command(program, args);
        log::debug!("$ {}", line);

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        own_process_group(&mut command);
        let mut child = command
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ProcessError::NotFound {
                    program: program.to_string(),
                },
                _ => ProcessError::Io {
                    command: line.clone(),
                    message: e.to_string(),
                },
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    let _ = child.kill();
                    return Err(ProcessError::Io {
                        command: line,
                        message: e.to_string(),
                    });
                }
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                log::debug!("killed after {:?}: {}", self.timeout, line);
                // Reader threads end once the pipes close; they are not joined.
                return Err(ProcessError::Timeout {
                    command: line,
                    secs: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);
        log::debug!("exit {:?}: {}", status.code(), line);
        if !stdout.is_empty() {
            log::trace!("stdout: {}", stdout.trim_end());
        }
        if !stderr.is_empty() {
            log::trace!("stderr: {}", stderr.trim_end());
        }

        Ok(CommandResult::new(status.code(), stdout, stderr))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Keep terminal Ctrl+C away from the child; cancellation is decided by
/// the engine's checkpoints.
#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn own_process_group(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    command.creation_flags(CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn own_process_group(_command: &mut Command) {}
