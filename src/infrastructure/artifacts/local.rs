//! Operator-supplied binary (`--binary PATH`)

use std::path::PathBuf;

use crate::domain::ports::ArtifactSource;
use crate::domain::value_objects::Architecture;
use crate::error::{DeployError, DeployResult};

pub struct LocalBinarySource {
    path: PathBuf,
}

impl LocalBinarySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for LocalBinarySource {
    /// The same file for every architecture; the operator vouches for it
    fn obtain(&self, arch: Architecture) -> DeployResult<PathBuf> {
        if !self.path.is_file() {
            return Err(DeployError::ArtifactUnavailable {
                detail: format!("{} is not a file", self.path.display()),
            });
        }
        log::debug!("using {} for {}", self.path.display(), arch);
        Ok(self.path.clone())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
