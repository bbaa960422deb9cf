//! Artifact Source Port
//!
//! Yields a local binary for a given architecture.

use std::path::PathBuf;

use crate::domain::value_objects::Architecture;
use crate::error::DeployResult;

pub trait ArtifactSource {
    /// Local path of a binary built for `arch`; fails with `ArtifactUnavailable`
    fn obtain(&self, arch: Architecture) -> DeployResult<PathBuf>;

    /// Human-readable origin (release version, file path)
    fn describe(&self) -> String;
}
