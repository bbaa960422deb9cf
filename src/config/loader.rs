//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ConfigWarning, FridaVersion};
use crate::error::{DeployError, DeployResult};

use super::types::Config;

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "droidprep.toml";

/// Config plus where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when only defaults (and environment) apply
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| DeployError::Config {
        message: format!("cannot read {}: {}", path.display(), e),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        message: format!("{}: {}", path.display(), e),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Candidate files in lookup order
pub fn search_paths(cwd: &Path, user_config_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join(PROJECT_CONFIG_FILE)];
    if let Some(dir) = user_config_dir {
        paths.push(dir.join("droidprep").join("config.toml"));
    }
    paths
}

/// First config found of `explicit`, `./droidprep.toml`, then the user
/// config file. An explicit path that does not exist is an error; missing
/// implicit files are skipped.
pub fn discover(
    explicit: Option<&Path>,
    cwd: &Path,
    user_config_dir: Option<&Path>,
) -> DeployResult<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(DeployError::Config {
                message: format!("config file {} not found", path.display()),
            });
        }
        let (config, warnings) = load_with_warnings(path)?;
        return Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            warnings,
        });
    }

    for path in search_paths(cwd, user_config_dir) {
        if path.is_file() {
            log::debug!("loading config from {}", path.display());
            let (config, warnings) = load_with_warnings(&path)?;
            return Ok(LoadedConfig {
                config,
                source: Some(path),
                warnings,
            });
        }
    }

    Ok(LoadedConfig::default())
}

/// Discover from the real working and config directories, then apply
/// `DROIDPREP_*` overrides
pub fn load(explicit: Option<&Path>) -> DeployResult<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    let user_dir = dirs::config_dir();
    let mut loaded = discover(explicit, &cwd, user_dir.as_deref())?;
    loaded.config = with_env_overrides(loaded.config, |name| std::env::var(name).ok())?;
    Ok(loaded)
}

/// Apply environment variable overrides (DROIDPREP_* prefix)
///
/// Malformed values are `Config` errors rather than silently ignored.
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> DeployResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(adb) = get("DROIDPREP_ADB") {
        config.tools.adb = adb;
    }

    if let Some(openssl) = get("DROIDPREP_OPENSSL") {
        config.tools.openssl = openssl;
    }

    if let Some(secs) = get("DROIDPREP_TIMEOUT_SECS") {
        config.tools.timeout_secs = secs.trim().parse().map_err(|_| DeployError::Config {
            message: format!("DROIDPREP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", secs),
        })?;
    }

    if let Some(path) = get("DROIDPREP_CERT_FILE") {
        config.certificate.path = Some(PathBuf::from(path));
    }

    if let Some(version) = get("DROIDPREP_FRIDA_VERSION") {
        config.frida.version = version
            .parse::<FridaVersion>()
            .map_err(|message| DeployError::Config {
                message: format!("DROIDPREP_FRIDA_VERSION: {}", message),
            })?;
    }

    if let Some(dir) = get("DROIDPREP_FRIDA_CACHE") {
        config.frida.cache_dir = Some(PathBuf::from(dir));
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "tools",
        "adb",
        "openssl",
        "timeout_secs",
        "certificate",
        "path",
        "store_dir",
        "reboot",
        "frida",
        "version",
        "remote_path",
        "cache_dir",
        "download_base_url",
        "fallback_arch",
        "selinux_permissive",
        "verify_attempts",
        "verify_delay_ms",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .filter(|(_, dist)| *dist > 0 && *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_bytes.len()]
}
