//! Domain Entities
//!
//! Core domain objects: the device session, the artifact being installed
//! and the partition mount state the engine must put back.

mod artifact;
mod device_session;
mod mount_state;

pub use artifact::{ArtifactKind, DeploymentArtifact};
pub use device_session::{AttachedDevice, ConnectivityState, DeviceSession, RootAccess};
pub use mount_state::{PartitionMountState, SYSTEM_MOUNT_POINTS};
