//! Configuration module for droidprep
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DROIDPREP_*)
//! 3. Config file: `--config PATH`, else `./droidprep.toml`, else
//!    `<config dir>/droidprep/config.toml`
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{discover, load, search_paths, with_env_overrides, LoadedConfig, PROJECT_CONFIG_FILE};
pub use types::{CertificateConfig, Config, FridaConfig, ToolsConfig};
