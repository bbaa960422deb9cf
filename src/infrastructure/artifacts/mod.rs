//! Artifact source implementations

mod frida;
mod local;

pub use frida::{extract_xz, FridaReleaseSource, DEFAULT_DOWNLOAD_BASE_URL};
pub use local::LocalBinarySource;
