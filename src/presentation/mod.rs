//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating the engine with infrastructure dependencies
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `factory` - Creates the engine, toolkit and artifact source (dependency injection)

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen, Commands};
pub use factory::{create_engine, ConcreteEngine};
