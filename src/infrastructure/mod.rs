//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all process, network and file I/O.
//!
//! ## Structure
//!
//! - `process/` - Command runners (subprocess, scripted)
//! - `adb` - `Bridge` over the adb executable
//! - `openssl` - `CertToolkit` over the openssl executable
//! - `artifacts/` - frida-server release cache and local binaries
//! - `events/` - NDJSON event sink
//! - `host` - Host tool and package manager detection

pub mod adb;
pub mod artifacts;
pub mod events;
pub mod host;
pub mod openssl;
pub mod process;

// Re-export for convenience
pub use adb::AdbBridge;
pub use artifacts::{FridaReleaseSource, LocalBinarySource};
pub use events::JsonEventSink;
pub use openssl::OpenSslToolkit;
pub use process::{RecordingRunner, SystemRunner};
