//! Frida release version (`x.y.z`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_FRIDA_VERSION: &str = "17.5.2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FridaVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl FridaVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for FridaVersion {
    fn default() -> Self {
        Self::new(17, 5, 2)
    }
}

impl FromStr for FridaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let parse = |p: &str| -> Option<u32> {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            p.parse().ok()
        };
        match parts.as_slice() {
            [major, minor, patch] => match (parse(major), parse(minor), parse(patch)) {
                (Some(major), Some(minor), Some(patch)) => Ok(Self::new(major, minor, patch)),
                _ => Err(format!("invalid version '{}' (expected x.y.z)", s)),
            },
            _ => Err(format!("invalid version '{}' (expected x.y.z)", s)),
        }
    }
}

impl fmt::Display for FridaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for FridaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FridaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
