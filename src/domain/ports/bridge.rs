//! Device Bridge Port
//!
//! Synchronous request/response access to attached devices. Implemented by
//! the adb adapter in infrastructure and by fakes in the engine tests.
//!
//! Shell commands that run but exit nonzero come back as `Ok` results; the
//! caller decides what a failure means. Errors are reserved for the bridge
//! itself being unusable, the device disappearing, or operations whose
//! failure has one meaning (push, remount, root).

use std::path::Path;

use crate::domain::entities::AttachedDevice;
use crate::domain::value_objects::CommandResult;
use crate::error::DeployResult;

pub trait Bridge {
    /// Attached devices in bridge order; empty is valid
    fn list_devices(&self) -> DeployResult<Vec<AttachedDevice>>;

    /// Run a shell command on the device
    fn shell(&self, serial: &str, command: &str) -> DeployResult<CommandResult>;

    /// Copy a local file to the device; nonzero exit is `PushFailed`
    fn push(&self, serial: &str, local: &Path, remote: &str) -> DeployResult<CommandResult>;

    /// Restart the bridge daemon as root and wait for the device.
    /// Production builds refusing root is `RootRequired`.
    fn root(&self, serial: &str) -> DeployResult<CommandResult>;

    /// Remount the system partition read-write or back to read-only.
    /// Refusal is `RemountDenied`.
    fn remount(&self, serial: &str, writable: bool) -> DeployResult<CommandResult>;

    fn reboot(&self, serial: &str) -> DeployResult<CommandResult>;
}
