//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod architecture;
mod command_result;
mod config_warning;
mod deploy_stage;
mod frida_version;
mod hash;
mod store_filename;

pub use architecture::Architecture;
pub use command_result::CommandResult;
pub use config_warning::ConfigWarning;
pub use deploy_stage::DeployStage;
pub use frida_version::{FridaVersion, DEFAULT_FRIDA_VERSION};
pub use hash::ContentHash;
pub use store_filename::StoreFilename;
