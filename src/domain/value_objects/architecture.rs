//! Architecture value object - canonical CPU family of a device

use serde::{Deserialize, Serialize};

/// Canonical architecture tag for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// 32-bit ARM (armeabi, armeabi-v7a)
    Arm,
    /// 64-bit ARM (arm64-v8a)
    Arm64,
    /// 32-bit x86
    X86,
    /// 64-bit x86
    #[value(name = "x86_64")]
    X86_64,
    /// ABI string matched nothing known
    #[value(skip)]
    Unknown,
}

/// ABI substrings in match priority order.
///
/// 64-bit entries come first: "x86_64" also contains "x86" and an
/// abilist-style string may carry both "arm64" and "armeabi".
const ABI_PATTERNS: &[(&str, Architecture)] = &[
    ("arm64", Architecture::Arm64),
    ("aarch64", Architecture::Arm64),
    ("x86_64", Architecture::X86_64),
    ("amd64", Architecture::X86_64),
    ("armeabi", Architecture::Arm),
    ("arm", Architecture::Arm),
    ("x86", Architecture::X86),
    ("i686", Architecture::X86),
    ("i386", Architecture::X86),
];

impl Architecture {
    /// All concrete architectures (excluding `Unknown`)
    pub const ALL_CONCRETE: [Architecture; 4] = [
        Architecture::Arm,
        Architecture::Arm64,
        Architecture::X86,
        Architecture::X86_64,
    ];

    /// Map a reported ABI string to its canonical tag
    pub fn from_abi(abi: &str) -> Self {
        let abi = abi.trim().to_ascii_lowercase();
        if abi.is_empty() {
            return Architecture::Unknown;
        }
        ABI_PATTERNS
            .iter()
            .find(|(pattern, _)| abi.contains(pattern))
            .map(|(_, arch)| *arch)
            .unwrap_or(Architecture::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Architecture::Unknown)
    }

    pub fn is_64bit(&self) -> bool {
        matches!(self, Architecture::Arm64 | Architecture::X86_64)
    }

    /// Suffix used by frida release assets, `None` for `Unknown`
    pub fn frida_suffix(&self) -> Option<&'static str> {
        match self {
            Architecture::Arm => Some("android-arm"),
            Architecture::Arm64 => Some("android-arm64"),
            Architecture::X86 => Some("android-x86"),
            Architecture::X86_64 => Some("android-x86_64"),
            Architecture::Unknown => None,
        }
    }

    /// Parse either a canonical tag or a frida suffix (`android-arm64`)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        let s = s.strip_prefix("android-").unwrap_or(&s);
        match s {
            "arm" => Some(Architecture::Arm),
            "arm64" => Some(Architecture::Arm64),
            "x86" => Some(Architecture::X86),
            "x86_64" => Some(Architecture::X86_64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
            Architecture::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
