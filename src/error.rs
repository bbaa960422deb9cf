//! Error types for droidprep
//!
//! Uses `thiserror` for library errors. Every variant names the step that
//! failed so an operator can pick up manually from there.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Step of a deployment run an error (or warning) is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStep {
    Bridge,
    Select,
    Root,
    Architecture,
    Artifact,
    Certificate,
    Remount,
    Push,
    Permission,
    Launch,
    Verify,
    Restore,
    Config,
}

impl DeployStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStep::Bridge => "bridge",
            DeployStep::Select => "select",
            DeployStep::Root => "root",
            DeployStep::Architecture => "architecture",
            DeployStep::Artifact => "artifact",
            DeployStep::Certificate => "certificate",
            DeployStep::Remount => "remount",
            DeployStep::Push => "push",
            DeployStep::Permission => "permission",
            DeployStep::Launch => "launch",
            DeployStep::Verify => "verify",
            DeployStep::Restore => "restore",
            DeployStep::Config => "config",
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Bridge executable missing or not runnable
    #[error("[bridge] cannot run '{program}': {detail}")]
    BridgeUnavailable { program: String, detail: String },

    /// Device went away (or never was attached)
    #[error("[{step}] device {serial} unreachable: {detail}")]
    DeviceUnreachable {
        serial: String,
        step: DeployStep,
        detail: String,
    },

    /// Several devices attached and none chosen
    #[error("[select] {} devices attached ({}); choose one with --serial", .candidates.len(), .candidates.join(", "))]
    AmbiguousDevice { candidates: Vec<String> },

    /// Neither adbd root nor su is available
    #[error("[root] root access required on {serial}: {detail}")]
    RootRequired { serial: String, detail: String },

    /// Device refused to remount the system partition read-write
    #[error("[remount] system partition on {serial} cannot be made writable: {detail}")]
    RemountDenied { serial: String, detail: String },

    /// ABI did not map to a known architecture and no fallback was configured
    #[error("[architecture] unsupported ABI '{abi}' on {serial}; pass --arch or --fallback-arch")]
    UnsupportedArchitecture { serial: String, abi: String },

    /// Toolkit could not parse the certificate
    #[error("[certificate] invalid certificate {}: {detail}", .path.display())]
    InvalidCertificate { path: PathBuf, detail: String },

    /// Binary artifact could not be found or fetched
    #[error("[artifact] {detail}")]
    ArtifactUnavailable { detail: String },

    /// Push to device failed
    #[error("[push] failed to push {} to {remote}: {detail}", .local.display())]
    PushFailed {
        local: PathBuf,
        remote: String,
        detail: String,
    },

    /// chmod / chown on the device failed
    #[error("[permission] cannot set permissions on {remote}: {detail}")]
    PermissionDenied { remote: String, detail: String },

    /// Launched binary could not be confirmed running (warning-level)
    #[error("[verify] {remote} is not listed as running: {detail}")]
    DeploymentUnverified { remote: String, detail: String },

    /// External command exceeded its timeout
    #[error("[{step}] '{command}' timed out after {secs}s")]
    BridgeTimeout {
        command: String,
        step: DeployStep,
        secs: u64,
    },

    /// Configuration file or value rejected
    #[error("[config] {message}")]
    Config { message: String },

    /// Run aborted by the operator
    #[error("[{step}] interrupted")]
    Interrupted { step: DeployStep },

    /// Local IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Step the error is attributed to
    pub fn step(&self) -> DeployStep {
        match self {
            DeployError::BridgeUnavailable { .. } => DeployStep::Bridge,
            DeployError::DeviceUnreachable { step, .. } => *step,
            DeployError::AmbiguousDevice { .. } => DeployStep::Select,
            DeployError::RootRequired { .. } => DeployStep::Root,
            DeployError::RemountDenied { .. } => DeployStep::Remount,
            DeployError::UnsupportedArchitecture { .. } => DeployStep::Architecture,
            DeployError::InvalidCertificate { .. } => DeployStep::Certificate,
            DeployError::ArtifactUnavailable { .. } => DeployStep::Artifact,
            DeployError::PushFailed { .. } => DeployStep::Push,
            DeployError::PermissionDenied { .. } => DeployStep::Permission,
            DeployError::DeploymentUnverified { .. } => DeployStep::Verify,
            DeployError::BridgeTimeout { step, .. } => *step,
            DeployError::Config { .. } => DeployStep::Config,
            DeployError::Interrupted { step } => *step,
            DeployError::Io(_) => DeployStep::Artifact,
        }
    }

    /// Re-attribute a device-level failure to the engine step that hit it
    pub fn at_step(self, step: DeployStep) -> Self {
        match self {
            DeployError::DeviceUnreachable { serial, detail, .. } => DeployError::DeviceUnreachable {
                serial,
                step,
                detail,
            },
            DeployError::BridgeTimeout { command, secs, .. } => DeployError::BridgeTimeout {
                command,
                step,
                secs,
            },
            other => other,
        }
    }

    /// Warning-level errors do not fail a run unless strict mode asks for it
    pub fn is_warning(&self) -> bool {
        matches!(self, DeployError::DeploymentUnverified { .. })
    }

    /// Process exit code for this error (one per taxonomy entry)
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::Config { .. } => 2,
            DeployError::BridgeUnavailable { .. } => 10,
            DeployError::DeviceUnreachable { .. } => 11,
            DeployError::AmbiguousDevice { .. } => 12,
            DeployError::RootRequired { .. } => 13,
            DeployError::RemountDenied { .. } => 14,
            DeployError::UnsupportedArchitecture { .. } => 15,
            DeployError::InvalidCertificate { .. } => 16,
            DeployError::PushFailed { .. } => 17,
            DeployError::PermissionDenied { .. } => 18,
            DeployError::DeploymentUnverified { .. } => 19,
            DeployError::BridgeTimeout { .. } => 20,
            DeployError::ArtifactUnavailable { .. } => 21,
            DeployError::Interrupted { .. } => 130,
            DeployError::Io(_) => 1,
        }
    }

    /// Short operator hint for resuming by hand
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DeployError::BridgeUnavailable { .. } => Some(
                "Install the missing tool (`droidprep tools --install`) or set its path under [tools] in droidprep.toml",
            ),
            DeployError::AmbiguousDevice { .. } => Some("Pick a device with `-s <serial>`"),
            DeployError::RootRequired { .. } => {
                Some("Use an emulator image without Google Play, or a rooted device with su")
            }
            DeployError::RemountDenied { .. } => {
                Some("Run `adb disable-verity`, reboot, then `adb root && adb remount`")
            }
            DeployError::UnsupportedArchitecture { .. } => {
                Some("Check `adb shell getprop ro.product.cpu.abi` and pass --arch")
            }
            DeployError::PushFailed { .. } => Some("Re-run the push in full; partial files are not resumed"),
            DeployError::DeploymentUnverified { .. } => {
                Some("Check with `adb shell pidof frida-server` before re-running")
            }
            DeployError::BridgeTimeout { .. } => {
                Some("Raise tools.timeout_secs or check the device connection")
            }
            _ => None,
        }
    }
}
