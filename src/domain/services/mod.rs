//! Domain Services
//!
//! Request/response logic the engine calls in sequence: device selection,
//! architecture resolution, certificate identification and the device
//! shell command vocabulary.

pub mod arch_resolver;
pub mod cert_identifier;
pub mod device_selector;
pub mod shell;

pub use arch_resolver::{ArchitectureChoice, ResolvedArchitecture};
pub use cert_identifier::{CertIdentifier, PreparedCertificate};
pub use device_selector::select_device;
