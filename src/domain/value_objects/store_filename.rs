//! Trust store filename value object
//!
//! Android's system CA store looks certificates up by the legacy
//! (`-subject_hash_old`) subject hash: 8 hex digits plus a `.0` suffix.

use std::fmt;

/// Validated `<hash>.0` filename
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreFilename {
    hash: String,
}

impl StoreFilename {
    pub const SUFFIX: &'static str = ".0";

    /// Build from a subject hash; `None` unless it is exactly 8 hex digits
    pub fn from_hash(hash: &str) -> Option<Self> {
        let hash = hash.trim();
        if hash.len() == 8 && hash.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self {
                hash: hash.to_ascii_lowercase(),
            })
        } else {
            None
        }
    }

    pub fn subject_hash(&self) -> &str {
        &self.hash
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.hash, Self::SUFFIX)
    }
}

impl fmt::Display for StoreFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hash, Self::SUFFIX)
    }
}
