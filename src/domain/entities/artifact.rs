//! Deployment Artifact entity
//!
//! A binary or certificate file bound for one device path. Immutable once
//! constructed; one instance per deployment attempt.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{Architecture, ContentHash, StoreFilename};

/// What is being installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Binary { arch: Architecture },
    Certificate { name: StoreFilename },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentArtifact {
    local_path: PathBuf,
    remote_path: String,
    mode: u32,
    owner: Option<String>,
    kind: ArtifactKind,
    digest: ContentHash,
}

impl DeploymentArtifact {
    /// Executable binary, mode 755, owned by whoever pushed it
    pub fn binary(
        local_path: impl Into<PathBuf>,
        remote_path: impl Into<String>,
        arch: Architecture,
        digest: ContentHash,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            mode: 0o755,
            owner: None,
            kind: ArtifactKind::Binary { arch },
            digest,
        }
    }

    /// Trust store entry `<store_dir>/<hash>.0`, mode 644, root:root
    pub fn certificate(
        local_path: impl Into<PathBuf>,
        store_dir: &str,
        name: StoreFilename,
        digest: ContentHash,
    ) -> Self {
        let remote_path = format!("{}/{}", store_dir.trim_end_matches('/'), name.file_name());
        Self {
            local_path: local_path.into(),
            remote_path,
            mode: 0o644,
            owner: Some("root:root".to_string()),
            kind: ArtifactKind::Certificate { name },
            digest,
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Mode as chmod argument (`755`)
    pub fn mode_octal(&self) -> String {
        format!("{:o}", self.mode)
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    pub fn digest(&self) -> &ContentHash {
        &self.digest
    }

    pub fn is_certificate(&self) -> bool {
        matches!(self.kind, ArtifactKind::Certificate { .. })
    }

    /// Final path component of the remote path
    pub fn remote_file_name(&self) -> &str {
        self.remote_path
            .rsplit('/')
            .next()
            .unwrap_or(self.remote_path.as_str())
    }
}
