pub mod deploy;
pub mod devices;
pub mod tools;
