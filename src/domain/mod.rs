//! Domain Layer
//!
//! Device deployment rules, independent of how adb or openssl are invoked.
//!
//! ## Structure
//!
//! - `entities/` - Device session, deployment artifact, partition mount state
//! - `value_objects/` - Architecture, command result, hashes, versions, stages
//! - `services/` - Device selection, architecture resolution, certificate naming
//! - `ports/` - Bridge, toolkit, runner, artifact source and event interfaces
//!
//! All device and process access goes through `ports`. The certificate
//! identifier stages its output in a temporary directory on the host.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
