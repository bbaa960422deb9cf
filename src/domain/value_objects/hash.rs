//! Content Hash Value Object
//!
//! SHA-256 of an artifact's bytes. Compared against `sha256sum` output on
//! the device after a push.

use std::fmt;

/// Content hash value object
///
/// Wraps a lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Compute SHA-256 of content
    pub fn from_bytes(content: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        Self(format!("{:x}", Sha256::digest(content)))
    }

    /// Parse the first field of `sha256sum` output
    pub fn from_sha256sum_output(output: &str) -> Option<Self> {
        let hex = output.split_whitespace().next()?;
        if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(hex.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn hex(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for display
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}
