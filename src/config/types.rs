//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::{CertInstallOptions, FridaOptions};
use crate::application::deploy::{DEFAULT_REMOTE_PATH, DEFAULT_STORE_DIR};
use crate::domain::value_objects::{Architecture, ConfigWarning, FridaVersion};
use crate::error::DeployResult;
use crate::infrastructure::artifacts::DEFAULT_DOWNLOAD_BASE_URL;

use super::loader;

/// Host tool locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_adb")]
    pub adb: String,

    #[serde(default = "default_openssl")]
    pub openssl: String,

    /// Per-invocation timeout for every external command
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            adb: default_adb(),
            openssl: default_openssl(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ToolsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_adb() -> String {
    "adb".to_string()
}

fn default_openssl() -> String {
    "openssl".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// `[certificate]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateConfig {
    /// Certificate installed when `--cert-file` is not given
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    #[serde(default)]
    pub reboot: bool,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            path: None,
            store_dir: default_store_dir(),
            reboot: false,
        }
    }
}

fn default_store_dir() -> String {
    DEFAULT_STORE_DIR.to_string()
}

/// `[frida]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FridaConfig {
    #[serde(default)]
    pub version: FridaVersion,

    #[serde(default = "default_remote_path")]
    pub remote_path: String,

    /// Where downloaded releases are kept; platform cache dir when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default = "default_download_base_url")]
    pub download_base_url: String,

    #[serde(default)]
    pub fallback_arch: Option<Architecture>,

    #[serde(default = "default_true")]
    pub selinux_permissive: bool,

    #[serde(default = "default_verify_attempts")]
    pub verify_attempts: u32,

    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u64,
}

impl Default for FridaConfig {
    fn default() -> Self {
        Self {
            version: FridaVersion::default(),
            remote_path: default_remote_path(),
            cache_dir: None,
            download_base_url: default_download_base_url(),
            fallback_arch: None,
            selinux_permissive: true,
            verify_attempts: default_verify_attempts(),
            verify_delay_ms: default_verify_delay_ms(),
        }
    }
}

impl FridaConfig {
    /// Configured cache directory, else `<cache dir>/droidprep`
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("droidprep")
        })
    }
}

fn default_remote_path() -> String {
    DEFAULT_REMOTE_PATH.to_string()
}

fn default_download_base_url() -> String {
    DEFAULT_DOWNLOAD_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_verify_attempts() -> u32 {
    3
}

fn default_verify_delay_ms() -> u64 {
    1000
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub certificate: CertificateConfig,

    #[serde(default)]
    pub frida: FridaConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DeployResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (DROIDPREP_* prefix)
    pub fn with_env_overrides(self) -> DeployResult<Self> {
        loader::with_env_overrides(self, |name| std::env::var(name).ok())
    }

    /// Engine options for `cert`, before CLI flags
    pub fn cert_options(&self) -> CertInstallOptions {
        CertInstallOptions::new()
            .with_store_dir(self.certificate.store_dir.clone())
            .with_reboot(self.certificate.reboot)
    }

    /// Engine options for `frida`, before CLI flags
    pub fn frida_options(&self) -> FridaOptions {
        FridaOptions::new()
            .with_remote_path(self.frida.remote_path.clone())
            .with_fallback_arch(self.frida.fallback_arch)
            .with_selinux_permissive(self.frida.selinux_permissive)
            .with_verify(
                self.frida.verify_attempts,
                Duration::from_millis(self.frida.verify_delay_ms),
            )
    }
}
