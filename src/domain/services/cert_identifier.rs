//! Certificate Identifier
//!
//! Computes the trust-store filename of a certificate (`<subject hash>.0`)
//! and prepares a PEM copy under that name for pushing.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::domain::ports::{CertEncoding, CertToolkit};
use crate::domain::value_objects::{CommandResult, ContentHash, StoreFilename};
use crate::error::{DeployError, DeployResult};

/// PEM certificate named `<hash>.0` in a private temporary directory.
/// The directory is removed on drop.
#[derive(Debug)]
pub struct PreparedCertificate {
    _dir: TempDir,
    path: PathBuf,
    source: PathBuf,
    name: StoreFilename,
    digest: ContentHash,
    encoding: CertEncoding,
}

impl PreparedCertificate {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The certificate file the operator supplied
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn name(&self) -> &StoreFilename {
        &self.name
    }

    pub fn digest(&self) -> &ContentHash {
        &self.digest
    }

    /// Encoding the source was read as
    pub fn source_encoding(&self) -> CertEncoding {
        self.encoding
    }
}

pub struct CertIdentifier<'a, T: CertToolkit + ?Sized> {
    toolkit: &'a T,
}

impl<'a, T: CertToolkit + ?Sized> CertIdentifier<'a, T> {
    pub fn new(toolkit: &'a T) -> Self {
        Self { toolkit }
    }

    /// Store filename of an existing PEM certificate
    pub fn compute_store_filename(&self, pem: &Path) -> DeployResult<StoreFilename> {
        let result = self.toolkit.subject_hash_old(pem)?;
        if !result.success() {
            return Err(invalid(pem, result.describe()));
        }
        let line = result
            .first_line()
            .ok_or_else(|| invalid(pem, "toolkit printed no subject hash".to_string()))?;
        StoreFilename::from_hash(line)
            .ok_or_else(|| invalid(pem, format!("unexpected subject hash '{}'", line)))
    }

    /// Normalise `source` to PEM and stage it as `<hash>.0`.
    ///
    /// DER is tried first, then PEM. Nothing touches a device here, so a bad
    /// certificate is reported before any device interaction.
    pub fn prepare(&self, source: &Path) -> DeployResult<PreparedCertificate> {
        let metadata = fs::metadata(source)
            .map_err(|e| invalid(source, format!("cannot read file: {}", e)))?;
        if !metadata.is_file() {
            return Err(invalid(source, "not a regular file".to_string()));
        }

        let dir = tempfile::Builder::new().prefix("droidprep-cert").tempdir()?;
        let converted = dir.path().join("certificate.pem");

        let mut encoding = None;
        let mut last_failure: Option<CommandResult> = None;
        for candidate in [CertEncoding::Der, CertEncoding::Pem] {
            let result = self.toolkit.to_pem(source, &converted, candidate)?;
            if result.success() && converted.is_file() {
                encoding = Some(candidate);
                break;
            }
            log::debug!(
                "{} is not {}: {}",
                source.display(),
                candidate.as_str(),
                result.describe()
            );
            last_failure = Some(result);
        }
        let encoding = encoding.ok_or_else(|| {
            invalid(
                source,
                last_failure
                    .map(|r| format!("neither DER nor PEM ({})", r.describe()))
                    .unwrap_or_else(|| "neither DER nor PEM".to_string()),
            )
        })?;

        let name = self.compute_store_filename(&converted)?;
        let path = dir.path().join(name.file_name());
        fs::rename(&converted, &path)?;
        let digest = ContentHash::from_bytes(&fs::read(&path)?);

        log::debug!(
            "{} ({}) -> {} {}",
            source.display(),
            encoding.as_str(),
            name,
            digest.short()
        );

        Ok(PreparedCertificate {
            _dir: dir,
            path,
            source: source.to_path_buf(),
            name,
            digest,
            encoding,
        })
    }
}

fn invalid(path: &Path, detail: String) -> DeployError {
    DeployError::InvalidCertificate {
        path: path.to_path_buf(),
        detail,
    }
}
