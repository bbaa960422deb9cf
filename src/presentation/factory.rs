//! Engine Factory
//!
//! Wires the deployment engine and its collaborators to the real host
//! tools. This is the dependency injection point for the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{CancelToken, DeploymentEngine};
use crate::config::Config;
use crate::domain::ports::{ArtifactSource, DeployEventSink};
use crate::domain::value_objects::FridaVersion;
use crate::error::DeployResult;
use crate::infrastructure::{
    AdbBridge, FridaReleaseSource, LocalBinarySource, OpenSslToolkit, SystemRunner,
};

/// Engine driving the real adb executable
pub type ConcreteEngine = DeploymentEngine<AdbBridge<SystemRunner>>;

/// openssl toolkit with the configured timeout
pub type ConcreteToolkit = OpenSslToolkit<SystemRunner>;

pub fn create_runner(config: &Config) -> SystemRunner {
    SystemRunner::new(config.tools.timeout())
}

/// adb bridge; fails with `BridgeUnavailable` when adb is not installed
pub fn create_bridge(config: &Config) -> DeployResult<AdbBridge<SystemRunner>> {
    AdbBridge::locate(create_runner(config), &config.tools.adb)
}

pub fn create_toolkit(config: &Config) -> DeployResult<ConcreteToolkit> {
    OpenSslToolkit::locate(create_runner(config), &config.tools.openssl)
}

/// Engine reporting to `events` and stopping at the next step once
/// `cancel` fires
pub fn create_engine(
    config: &Config,
    events: Arc<dyn DeployEventSink>,
    cancel: CancelToken,
) -> DeployResult<ConcreteEngine> {
    Ok(DeploymentEngine::new(create_bridge(config)?)
        .with_events(events)
        .with_cancel_token(cancel))
}

/// `--binary` wins; otherwise the release for `version` (or the configured
/// one) from the download cache
pub fn create_artifact_source(
    config: &Config,
    version: Option<FridaVersion>,
    binary: Option<PathBuf>,
) -> Box<dyn ArtifactSource> {
    match binary {
        Some(path) => Box::new(LocalBinarySource::new(path)),
        None => Box::new(
            FridaReleaseSource::new(
                version.unwrap_or(config.frida.version),
                config.frida.resolved_cache_dir(),
            )
            .with_base_url(config.frida.download_base_url.clone()),
        ),
    }
}
