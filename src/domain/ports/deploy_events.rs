//! Deploy Event Port
//!
//! Observable interface for engine runs: console progress, NDJSON
//! streams for automation, and test recording.

use crate::domain::value_objects::DeployStage;
use crate::error::DeployStep;

/// What a run installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTask {
    Certificate,
    Binary,
}

impl DeployTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployTask::Certificate => "certificate",
            DeployTask::Binary => "binary",
        }
    }
}

/// Event emitted during a deployment run
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Run started on a selected device
    Started { serial: String, task: DeployTask },

    /// Engine entered a new state
    StageReached { serial: String, stage: DeployStage },

    /// External command issued (detailed sinks only)
    Command { serial: String, command: String },

    /// Non-fatal problem; the run continues
    Warning {
        serial: String,
        step: DeployStep,
        message: String,
    },

    /// Run finished
    Completed {
        serial: String,
        remote_path: String,
        restarted: bool,
    },

    /// Run aborted
    Failed {
        serial: String,
        step: DeployStep,
        message: String,
    },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: progress lines in the terminal
/// - JsonEventSink: NDJSON event stream
/// - NoopEventSink: silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);

    /// Whether per-command events are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
