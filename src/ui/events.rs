//! Console progress for engine runs

use std::io::{self, Write};
use std::sync::Mutex;

use droidprep::domain::ports::{DeployEvent, DeployEventSink};
use droidprep::domain::value_objects::DeployStage;

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Prints one line per stage; device commands only with `-v`
pub struct ConsoleEventSink {
    ui: UiContext,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn new(ui: UiContext) -> Self {
        Self::with_writer(ui, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(ui: UiContext, writer: W) -> Self {
        Self {
            ui,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn line(&self, icon: Icon, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(
                writer,
                "  {} {}",
                icon.colored(self.ui.color, self.ui.unicode),
                text
            );
        }
    }
}

fn stage_label(stage: DeployStage) -> Option<&'static str> {
    match stage {
        DeployStage::Idle | DeployStage::Done | DeployStage::Failed => None,
        DeployStage::DeviceSelected => Some("device selected"),
        DeployStage::Rooted => Some("root access"),
        DeployStage::ArchitectureResolved => Some("architecture resolved"),
        DeployStage::PartitionWritable => Some("system partition writable"),
        DeployStage::ArtifactPushed => Some("pushed"),
        DeployStage::PermissionsSet => Some("permissions set"),
        DeployStage::PartitionRestored => Some("system partition restored"),
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::Started { serial, task } => {
                self.line(Icon::Progress, format!("{} {}", task.as_str(), serial));
            }
            DeployEvent::StageReached { stage, .. } => {
                if let Some(label) = stage_label(stage) {
                    self.line(Icon::Success, label.to_string());
                }
            }
            DeployEvent::Command { command, .. } => {
                self.line(Icon::Arrow, ColoredText::dim(command).render(self.ui.color));
            }
            DeployEvent::Warning { step, message, .. } => {
                self.line(
                    Icon::Warning,
                    ColoredText::warning(format!("[{}] {}", step, message)).render(self.ui.color),
                );
            }
            DeployEvent::Completed { .. } => {}
            DeployEvent::Failed { step, message, .. } => {
                self.line(
                    Icon::Error,
                    ColoredText::error(format!("failed at {}: {}", step, message))
                        .render(self.ui.color),
                );
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.ui.verbose > 0
    }
}
