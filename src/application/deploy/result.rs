//! Deploy Report
//!
//! Outcome of a successful engine run.

use crate::domain::value_objects::{Architecture, DeployStage, StoreFilename};
use crate::error::{DeployError, DeployStep};

/// Category of a warning-level result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Override or fallback used instead of the detected architecture
    Architecture,
    /// `setenforce 0` failed
    Selinux,
    /// Partition could not be put back read-only
    RestoreFailed,
    /// Reboot request failed
    Reboot,
    /// Binary not seen running after launch
    Unverified,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Architecture => "architecture",
            WarningKind::Selinux => "selinux",
            WarningKind::RestoreFailed => "restore_failed",
            WarningKind::Reboot => "reboot",
            WarningKind::Unverified => "unverified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployWarning {
    pub kind: WarningKind,
    pub step: DeployStep,
    pub message: String,
}

/// Result of a deployment run
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub serial: String,
    /// Final path on the device
    pub remote_path: String,
    pub architecture: Option<Architecture>,
    pub store_filename: Option<StoreFilename>,
    /// States traversed, in order
    pub stages: Vec<DeployStage>,
    pub warnings: Vec<DeployWarning>,
    /// An already-running instance was stopped and relaunched
    pub restarted: bool,
    pub rebooted: bool,
    /// `pidof` output from the liveness check
    pub running_pids: Option<String>,
}

impl DeployReport {
    pub fn new(serial: impl Into<String>, remote_path: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            remote_path: remote_path.into(),
            architecture: None,
            store_filename: None,
            stages: Vec::new(),
            warnings: Vec::new(),
            restarted: false,
            rebooted: false,
            running_pids: None,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_verified(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::Unverified)
    }

    /// Error to fail with under `--strict`
    pub fn strict_failure(&self) -> Option<DeployError> {
        self.warnings
            .iter()
            .find(|w| w.kind == WarningKind::Unverified)
            .map(|w| DeployError::DeploymentUnverified {
                remote: self.remote_path.clone(),
                detail: w.message.clone(),
            })
    }
}
