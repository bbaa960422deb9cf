//! Deploy Options
//!
//! Per-run settings for certificate installs and binary deployments.

use std::time::Duration;

use crate::domain::value_objects::Architecture;

/// Android's system CA directory
pub const DEFAULT_STORE_DIR: &str = "/system/etc/security/cacerts";
pub const DEFAULT_REMOTE_PATH: &str = "/data/local/tmp/frida-server";

/// Options for a certificate install
#[derive(Debug, Clone)]
pub struct CertInstallOptions {
    /// Trust store directory on the device
    pub store_dir: String,
    /// Reboot once the certificate is in place
    pub reboot: bool,
}

impl CertInstallOptions {
    pub fn new() -> Self {
        Self {
            store_dir: DEFAULT_STORE_DIR.to_string(),
            reboot: false,
        }
    }

    pub fn with_store_dir(mut self, dir: impl Into<String>) -> Self {
        self.store_dir = dir.into();
        self
    }

    pub fn with_reboot(mut self, reboot: bool) -> Self {
        self.reboot = reboot;
        self
    }
}

impl Default for CertInstallOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for a binary deployment
#[derive(Debug, Clone)]
pub struct FridaOptions {
    /// Install path on the device
    pub remote_path: String,
    /// Deploy this architecture regardless of what the device reports
    pub arch_override: Option<Architecture>,
    /// Used when the reported ABI is not recognised
    pub fallback_arch: Option<Architecture>,
    /// Launch after install
    pub start: bool,
    /// Run `setenforce 0` before launching
    pub selinux_permissive: bool,
    /// Liveness checks after launch
    pub verify_attempts: u32,
    pub verify_delay: Duration,
}

impl FridaOptions {
    pub fn new() -> Self {
        Self {
            remote_path: DEFAULT_REMOTE_PATH.to_string(),
            arch_override: None,
            fallback_arch: None,
            start: true,
            selinux_permissive: true,
            verify_attempts: 3,
            verify_delay: Duration::from_millis(1000),
        }
    }

    pub fn with_remote_path(mut self, path: impl Into<String>) -> Self {
        self.remote_path = path.into();
        self
    }

    pub fn with_arch_override(mut self, arch: Option<Architecture>) -> Self {
        self.arch_override = arch;
        self
    }

    pub fn with_fallback_arch(mut self, arch: Option<Architecture>) -> Self {
        self.fallback_arch = arch;
        self
    }

    pub fn with_start(mut self, start: bool) -> Self {
        self.start = start;
        self
    }

    pub fn with_selinux_permissive(mut self, permissive: bool) -> Self {
        self.selinux_permissive = permissive;
        self
    }

    pub fn with_verify(mut self, attempts: u32, delay: Duration) -> Self {
        self.verify_attempts = attempts.max(1);
        self.verify_delay = delay;
        self
    }

    /// Process name used for `pidof`
    pub fn process_name(&self) -> &str {
        self.remote_path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("frida-server")
    }
}

impl Default for FridaOptions {
    fn default() -> Self {
        Self::new()
    }
}
