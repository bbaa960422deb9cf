//! Certificate Toolkit Port
//!
//! Wraps the cryptography toolkit. Raw results are returned; the
//! certificate identifier service interprets them.

use std::path::Path;

use crate::domain::value_objects::CommandResult;
use crate::error::DeployResult;

/// Input encoding of a certificate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertEncoding {
    Der,
    Pem,
}

impl CertEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertEncoding::Der => "DER",
            CertEncoding::Pem => "PEM",
        }
    }
}

pub trait CertToolkit {
    /// Re-encode `input` as PEM into `output`
    fn to_pem(&self, input: &Path, output: &Path, encoding: CertEncoding)
        -> DeployResult<CommandResult>;

    /// Legacy (pre-1.0 openssl) subject hash of a PEM certificate
    fn subject_hash_old(&self, pem: &Path) -> DeployResult<CommandResult>;
}
