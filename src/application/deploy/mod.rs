//! Deploy Module
//!
//! The deployment engine and its inputs and outputs.
//!
//! ## Structure
//!
//! - `options` - Per-run settings (`CertInstallOptions`, `FridaOptions`)
//! - `result` - Run outcome (`DeployReport`, `DeployWarning`)
//! - `engine` - State machine driving one device session (`DeploymentEngine`)
//!
//! ## Usage
//!
//! ```ignore
//! use droidprep::application::deploy::{CertInstallOptions, DeploymentEngine};
//!
//! let engine = DeploymentEngine::new(bridge).with_events(sink);
//! let mut session = engine.select_device(None)?;
//! let report = engine.install_certificate(&mut session, &prepared, &CertInstallOptions::new())?;
//! ```

mod engine;
mod options;
mod result;

pub use engine::DeploymentEngine;
pub use options::{CertInstallOptions, FridaOptions, DEFAULT_REMOTE_PATH, DEFAULT_STORE_DIR};
pub use result::{DeployReport, DeployWarning, WarningKind};

#[cfg(test)]
mod tests;
