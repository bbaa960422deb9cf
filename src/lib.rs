//! droidprep - Android device preparation for traffic interception
//!
//! Installs a CA certificate into the system trust store and deploys
//! frida-server, driving the device over adb.
//!
//! ## Architecture
//!
//! - `domain` - Entities, value objects, ports and pure services
//! - `application` - The deployment engine
//! - `infrastructure` - adb, openssl, subprocesses, downloads
//! - `presentation` - CLI definitions and dependency wiring
//! - `config` - TOML configuration with environment overrides

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{CancelToken, DeployReport, DeploymentEngine};
pub use config::Config;
pub use domain::value_objects::{Architecture, FridaVersion};
pub use error::{DeployError, DeployResult, DeployStep};
