//! frida-server release source
//!
//! Looks for `frida-server-<version>-android-<arch>` in the local cache and
//! otherwise downloads the `.xz` release asset and extracts it there.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use xz2::read::XzDecoder;

use crate::domain::ports::ArtifactSource;
use crate::domain::value_objects::{Architecture, FridaVersion};
use crate::error::{DeployError, DeployResult};

pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://github.com/frida/frida/releases/download";

pub struct FridaReleaseSource {
    version: FridaVersion,
    cache_dir: PathBuf,
    base_url: String,
}

impl FridaReleaseSource {
    pub fn new(version: FridaVersion, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            version,
            cache_dir: cache_dir.into(),
            base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn version(&self) -> &FridaVersion {
        &self.version
    }

    /// Extracted binary name, `None` for `Unknown`
    pub fn asset_name(&self, arch: Architecture) -> Option<String> {
        arch.frida_suffix()
            .map(|suffix| format!("frida-server-{}-{}", self.version, suffix))
    }

    pub fn download_url(&self, arch: Architecture) -> Option<String> {
        self.asset_name(arch)
            .map(|name| format!("{}/{}/{}.xz", self.base_url, self.version, name))
    }

    pub fn cached_path(&self, arch: Architecture) -> Option<PathBuf> {
        self.asset_name(arch).map(|name| self.cache_dir.join(name))
    }

    fn download(&self, url: &str, target: &Path) -> DeployResult<()> {
        log::info!("downloading {}", url);
        let response = reqwest::blocking::get(url).map_err(|e| unavailable(format!("download failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(unavailable(format!(
                "download of {} failed with status {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| unavailable(format!("failed to read response: {}", e)))?;
        log::debug!("downloaded {} bytes", bytes.len());

        fs::create_dir_all(&self.cache_dir)?;
        extract_xz(&bytes[..], &self.cache_dir, target)
            .map_err(|e| unavailable(format!("cannot extract {}: {}", url, e)))
    }
}

impl ArtifactSource for FridaReleaseSource {
    fn obtain(&self, arch: Architecture) -> DeployResult<PathBuf> {
        let (Some(url), Some(path)) = (self.download_url(arch), self.cached_path(arch)) else {
            return Err(unavailable(format!("no frida-server build for {}", arch)));
        };

        let cached = fs::metadata(&path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false);
        if cached {
            log::debug!("using cached {}", path.display());
            return Ok(path);
        }
        self.download(&url, &path)?;
        Ok(path)
    }

    fn describe(&self) -> String {
        format!("frida-server {}", self.version)
    }
}

/// Decompress an `.xz` stream into `target`, going through a temp file in
/// `dir` so a partial extraction never looks like a cache hit.
pub fn extract_xz<R: Read>(compressed: R, dir: &Path, target: &Path) -> io::Result<()> {
    let mut decoder = XzDecoder::new(compressed);
    let mut staging = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut decoder, staging.as_file_mut())?;
    staging.persist(target).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(target)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(target, perms)?;
    }
    Ok(())
}

fn unavailable(detail: String) -> DeployError {
    DeployError::ArtifactUnavailable { detail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use xz2::write::XzEncoder;

    fn source(dir: &Path) -> FridaReleaseSource {
        FridaReleaseSource::new("17.5.2".parse().unwrap(), dir)
    }

    #[test]
    fn release_url_layout() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            source(dir.path()).download_url(Architecture::Arm64).unwrap(),
            "https://github.com/frida/frida/releases/download/17.5.2/frida-server-17.5.2-android-arm64.xz"
        );
        assert!(source(dir.path()).download_url(Architecture::Unknown).is_none());
    }

    #[test]
    fn cached_binary_is_reused_without_download() {
        let dir = tempfile::tempdir().unwrap();
        let cached = dir.path().join("frida-server-17.5.2-android-x86_64");
        fs::write(&cached, b"ELF").unwrap();

        let src = source(dir.path()).with_base_url("http://127.0.0.1:9/unreachable");
        assert_eq!(src.obtain(Architecture::X86_64).unwrap(), cached);
    }

    #[test]
    fn unknown_arch_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = source(dir.path()).obtain(Architecture::Unknown).unwrap_err();
        assert_eq!(err.exit_code(), 21);
    }

    #[test]
    fn failed_download_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let src = source(dir.path()).with_base_url("http://127.0.0.1:9");
        let err = src.obtain(Architecture::Arm).unwrap_err();
        assert!(matches!(err, DeployError::ArtifactUnavailable { .. }));
        assert!(!dir.path().join("frida-server-17.5.2-android-arm").exists());
    }

    #[test]
    fn extract_writes_executable_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = XzEncoder::new(Vec::new(), 6);
        encoder.write_all(b"\x7fELF frida").unwrap();
        let compressed = encoder.finish().unwrap();

        let target = dir.path().join("frida-server");
        extract_xz(&compressed[..], dir.path(), &target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"\x7fELF frida");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn corrupt_archive_leaves_no_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("frida-server");
        assert!(extract_xz(&b"not xz"[..], dir.path(), &target).is_err());
        assert!(!target.exists());
    }
}
