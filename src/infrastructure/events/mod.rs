//! Event Sink Implementations
//!
//! The console sink lives on the binary side next to the rest of the UI.

mod json;

pub use json::JsonEventSink;
