//! Deployment run stages

use std::fmt;

/// State of one deployment run
///
/// Certificate runs skip `ArchitectureResolved`; binary runs skip
/// `PartitionWritable` and `PartitionRestored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStage {
    Idle,
    DeviceSelected,
    Rooted,
    ArchitectureResolved,
    PartitionWritable,
    ArtifactPushed,
    PermissionsSet,
    PartitionRestored,
    Done,
    Failed,
}

impl DeployStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployStage::Done | DeployStage::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStage::Idle => "idle",
            DeployStage::DeviceSelected => "device_selected",
            DeployStage::Rooted => "rooted",
            DeployStage::ArchitectureResolved => "architecture_resolved",
            DeployStage::PartitionWritable => "partition_writable",
            DeployStage::ArtifactPushed => "artifact_pushed",
            DeployStage::PermissionsSet => "permissions_set",
            DeployStage::PartitionRestored => "partition_restored",
            DeployStage::Done => "done",
            DeployStage::Failed => "failed",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
