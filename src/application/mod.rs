//! Application Layer
//!
//! Use cases that orchestrate device deployments.
//! This layer:
//! - Depends on the Domain layer (entities, services, ports)
//! - Coordinates infrastructure adapters through those ports
//!
//! ## Use Cases
//!
//! - `DeploymentEngine` - certificate install and binary deployment runs
//! - `CancelToken` - operator interrupt shared with the engine

pub mod cancel;
pub mod deploy;

pub use cancel::CancelToken;
pub use deploy::{
    CertInstallOptions, DeployReport, DeployWarning, DeploymentEngine, FridaOptions, WarningKind,
};
