//! Subcommand entry points
//!
//! Each command loads configuration through `CommandContext`, builds its
//! collaborators with the presentation factory and renders either
//! console output or NDJSON.

pub mod cert;
pub mod devices;
pub mod frida;
pub mod hash;
pub mod interactive;
pub mod tools;

use std::sync::Arc;

use anyhow::Result;
use droidprep::config::{self, Config, ConfigWarning};
use droidprep::domain::ports::DeployEventSink;
use droidprep::infrastructure::JsonEventSink;
use droidprep::presentation::Cli;
use droidprep::CancelToken;

use crate::ui::context::UiContext;
use crate::ui::events::ConsoleEventSink;
use crate::ui::primitives::icon::Icon;

/// Everything a command needs besides its own flags
pub struct CommandContext {
    pub ui: UiContext,
    pub config: Config,
    pub serial: Option<String>,
    pub cancel: CancelToken,
}

impl CommandContext {
    pub fn load(cli: &Cli, cancel: CancelToken) -> Result<Self> {
        let ui = UiContext::new(cli.json, cli.verbose, cli.color);
        let loaded = config::load(cli.config.as_deref())?;
        if let Some(source) = &loaded.source {
            log::debug!("config: {}", source.display());
        }

        let ctx = Self {
            ui,
            config: loaded.config,
            serial: cli.serial.clone(),
            cancel,
        };
        ctx.report_config_warnings(&loaded.warnings);
        Ok(ctx)
    }

    fn report_config_warnings(&self, warnings: &[ConfigWarning]) {
        for warning in warnings {
            if self.ui.json {
                let _ = crate::ui::json::emit(serde_json::json!({
                    "event": "config_warning",
                    "key": warning.key,
                    "file": warning.file.display().to_string(),
                    "line": warning.line,
                    "suggestion": warning.suggestion,
                }));
            } else {
                eprintln!(
                    "{} {}",
                    Icon::Warning.colored(self.ui.color, self.ui.unicode),
                    warning
                );
            }
        }
    }

    /// Same context aimed at another device
    pub fn with_serial(&self, serial: Option<String>) -> Self {
        Self {
            ui: self.ui,
            config: self.config.clone(),
            serial,
            cancel: self.cancel.clone(),
        }
    }

    /// Progress sink matching the output mode
    pub fn event_sink(&self, command: &'static str) -> Arc<dyn DeployEventSink> {
        if self.ui.json {
            Arc::new(JsonEventSink::stdout(command))
        } else {
            Arc::new(ConsoleEventSink::new(self.ui))
        }
    }

    /// Print rendered console output, or the JSON value in `--json` mode
    pub fn output(&self, text: impl FnOnce() -> String, json: impl FnOnce() -> serde_json::Value) -> Result<()> {
        if self.ui.json {
            crate::ui::json::emit(json())?;
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}
