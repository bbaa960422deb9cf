//! Command runner implementations
//!
//! Plus the mapping from runner failures to deployment errors, shared by
//! the adb and openssl adapters.

use std::path::PathBuf;

use crate::domain::ports::ProcessError;
use crate::error::{DeployError, DeployResult, DeployStep};

mod recording;
mod system;

pub use recording::RecordingRunner;
pub use system::{SystemRunner, DEFAULT_TIMEOUT};

/// Find an executable by name on PATH, or accept an explicit path
pub fn locate_program(program: &str) -> DeployResult<PathBuf> {
    which::which(program).map_err(|e| DeployError::BridgeUnavailable {
        program: program.to_string(),
        detail: e.to_string(),
    })
}

pub(crate) fn process_error(program: &str, err: ProcessError, step: DeployStep) -> DeployError {
    match err {
        ProcessError::NotFound { .. } => DeployError::BridgeUnavailable {
            program: program.to_string(),
            detail: "executable not found".to_string(),
        },
        ProcessError::Timeout { command, secs } => DeployError::BridgeTimeout { command, step, secs },
        ProcessError::Io { message, .. } => DeployError::BridgeUnavailable {
            program: program.to_string(),
            detail: message,
        },
    }
}
