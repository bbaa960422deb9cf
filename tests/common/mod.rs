//! Common test utilities for droidprep CLI tests.
//!
//! - `TestEnv`: isolated working and config directories plus a scripted
//!   `adb` stand-in

pub mod env;

pub use env::*;
