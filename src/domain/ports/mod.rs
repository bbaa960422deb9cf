//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure provides the adb, openssl and subprocess implementations.

pub mod artifact_source;
pub mod bridge;
pub mod cert_toolkit;
pub mod command_runner;
pub mod deploy_events;

pub use artifact_source::ArtifactSource;
pub use bridge::Bridge;
pub use cert_toolkit::{CertEncoding, CertToolkit};
pub use command_runner::{display_command, CommandRunner, ProcessError};
pub use deploy_events::{DeployEvent, DeployEventSink, DeployTask, NoopEventSink};
