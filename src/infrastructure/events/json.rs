//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events
pub struct JsonEventSink {
    command: &'static str,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Write to stdout, tagging every line with `command`
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            command,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let command = self.command;
        let json = match event {
            DeployEvent::Started { serial, task } => serde_json::json!({
                "event": "start",
                "command": command,
                "serial": serial,
                "task": task.as_str(),
            }),

            DeployEvent::StageReached { serial, stage } => serde_json::json!({
                "event": "stage",
                "command": command,
                "serial": serial,
                "stage": stage.as_str(),
            }),

            DeployEvent::Command { serial, command: line } => serde_json::json!({
                "event": "device_command",
                "command": command,
                "serial": serial,
                "line": line,
            }),

            DeployEvent::Warning {
                serial,
                step,
                message,
            } => serde_json::json!({
                "event": "warning",
                "command": command,
                "serial": serial,
                "step": step.as_str(),
                "message": message,
            }),

            DeployEvent::Completed {
                serial,
                remote_path,
                restarted,
            } => serde_json::json!({
                "event": "complete",
                "command": command,
                "status": "success",
                "serial": serial,
                "remote_path": remote_path,
                "restarted": restarted,
            }),

            DeployEvent::Failed {
                serial,
                step,
                message,
            } => serde_json::json!({
                "event": "complete",
                "command": command,
                "status": "failed",
                "serial": serial,
                "step": step.as_str(),
                "error": message,
            }),
        };

        self.write_event(json);
    }
}
