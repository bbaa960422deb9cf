//! Partition Mount State entity
//!
//! Tracks whether the system partition was writable before the run and
//! whether the engine changed it, so the original state can be put back.

/// Mount points checked for the system partition, in order.
/// System-as-root devices mount it at `/`.
pub const SYSTEM_MOUNT_POINTS: &[&str] = &["/system", "/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionMountState {
    original_writable: bool,
    writable: bool,
    changed: bool,
}

impl PartitionMountState {
    pub fn observed(original_writable: bool) -> Self {
        Self {
            original_writable,
            writable: original_writable,
            changed: false,
        }
    }

    pub fn original_writable(&self) -> bool {
        self.original_writable
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// True when the engine owes a restore
    pub fn needs_restore(&self) -> bool {
        self.changed && self.writable != self.original_writable
    }

    pub fn mark_writable(&mut self) {
        self.changed = self.changed || !self.writable;
        self.writable = true;
    }

    /// Record that a read-write remount is about to be issued.
    /// A restore is owed from here on, even if the remount call errors.
    pub fn mark_remount_attempted(&mut self) {
        self.mark_writable();
    }

    pub fn mark_restored(&mut self) {
        self.writable = self.original_writable;
    }

    /// Whether the system partition is mounted read-write, from
    /// `/proc/mounts` content. `None` when no system mount is listed.
    pub fn parse_writable(proc_mounts: &str) -> Option<bool> {
        for mount_point in SYSTEM_MOUNT_POINTS {
            // Later entries shadow earlier ones for the same mount point.
            let options = proc_mounts
                .lines()
                .filter_map(|line| {
                    let mut fields = line.split_whitespace();
                    let _device = fields.next()?;
                    let point = fields.next()?;
                    let _fstype = fields.next()?;
                    let options = fields.next()?;
                    (point == *mount_point).then_some(options)
                })
                .last();
            if let Some(options) = options {
                return Some(options.split(',').any(|opt| opt == "rw"));
            }
        }
        None
    }
}
