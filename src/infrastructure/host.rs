//! Host tool detection
//!
//! Checks whether adb and openssl are installed and suggests install
//! commands for the package managers found on this machine.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use crate::domain::ports::CommandRunner;

/// Host-side frida client, used for an optional post-deploy check
pub const FRIDA_PS: &str = "frida-ps";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::MacOs => "macos",
            HostOs::Linux => "linux",
            HostOs::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTool {
    Adb,
    OpenSsl,
}

impl HostTool {
    pub const ALL: [HostTool; 2] = [HostTool::Adb, HostTool::OpenSsl];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostTool::Adb => "adb",
            HostTool::OpenSsl => "openssl",
        }
    }
}

impl fmt::Display for HostTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where (if anywhere) a tool was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: HostTool,
    /// Configured program name or path
    pub program: String,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn is_installed(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Choco,
    Scoop,
    Winget,
    Brew,
    Apt,
    Yum,
    Pacman,
}

impl PackageManager {
    /// Managers worth looking for on `os`, in preference order
    pub fn candidates(os: HostOs) -> &'static [PackageManager] {
        match os {
            HostOs::Windows => &[PackageManager::Choco, PackageManager::Scoop, PackageManager::Winget],
            HostOs::MacOs => &[PackageManager::Brew],
            HostOs::Linux => &[PackageManager::Apt, PackageManager::Yum, PackageManager::Pacman],
            HostOs::Other => &[],
        }
    }

    /// Executable looked up on PATH
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Choco => "choco",
            PackageManager::Scoop => "scoop",
            PackageManager::Winget => "winget",
            PackageManager::Brew => "brew",
            PackageManager::Apt => "apt-get",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
        }
    }

    fn package(&self, tool: HostTool) -> &'static str {
        match (self, tool) {
            (PackageManager::Winget, HostTool::Adb) => "Google.AndroidStudio.PlatformTools",
            (PackageManager::Winget, HostTool::OpenSsl) => "OpenSSL.Light",
            (PackageManager::Brew, HostTool::Adb) => "android-platform-tools",
            (PackageManager::Yum | PackageManager::Pacman, HostTool::Adb) => "android-tools",
            (_, HostTool::Adb) => "adb",
            (_, HostTool::OpenSsl) => "openssl",
        }
    }

    /// Command lines installing `tools`, in order
    pub fn install_commands(&self, tools: &[HostTool]) -> Vec<Vec<String>> {
        let mut commands: Vec<Vec<&str>> = Vec::new();
        if *self == PackageManager::Apt && !tools.is_empty() {
            commands.push(vec!["sudo", "apt-get", "update"]);
        }
        for tool in tools {
            let package = self.package(*tool);
            commands.push(match self {
                PackageManager::Choco => vec!["choco", "install", package, "-y"],
                PackageManager::Scoop => vec!["scoop", "install", package],
                PackageManager::Winget => vec!["winget", "install", package],
                PackageManager::Brew => vec!["brew", "install", package],
                PackageManager::Apt => vec!["sudo", "apt-get", "install", "-y", package],
                PackageManager::Yum => vec!["sudo", "yum", "install", "-y", package],
                PackageManager::Pacman => vec!["sudo", "pacman", "-S", "--noconfirm", package],
            });
        }
        commands
            .into_iter()
            .map(|c| c.into_iter().map(str::to_string).collect())
            .collect()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PackageManager::Choco => "Chocolatey",
            PackageManager::Scoop => "Scoop",
            PackageManager::Winget => "winget",
            PackageManager::Brew => "Homebrew",
            PackageManager::Apt => "apt",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
        };
        f.write_str(name)
    }
}

/// Look up the configured adb and openssl programs
pub fn check_tools(adb: &str, openssl: &str) -> Vec<ToolStatus> {
    [(HostTool::Adb, adb), (HostTool::OpenSsl, openssl)]
        .into_iter()
        .map(|(tool, program)| ToolStatus {
            tool,
            program: program.to_string(),
            path: which::which(program).ok(),
        })
        .collect()
}

/// Package managers for `os` that are actually installed
pub fn available_managers(os: HostOs) -> Vec<PackageManager> {
    PackageManager::candidates(os)
        .iter()
        .copied()
        .filter(|m| which::which(m.program()).is_ok())
        .collect()
}

/// Run one install command attached to the terminal (sudo may prompt)
pub fn run_install_command(command: &[String]) -> io::Result<ExitStatus> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty install command"))?;
    log::info!("running {}", command.join(" "));
    Command::new(program).args(args).status()
}

pub fn locate_frida_ps() -> Option<PathBuf> {
    which::which(FRIDA_PS).ok()
}

/// Best-effort `frida-ps -D <serial>`: true when the client lists processes
/// through the freshly started server.
pub fn frida_ps_reachable<R: CommandRunner + ?Sized>(runner: &R, program: &str, serial: &str) -> bool {
    match runner.run(program, &["-D".to_string(), serial.to_string()]) {
        Ok(result) if result.success() => true,
        Ok(result) => {
            log::debug!("{} -D {}: {}", program, serial, result.describe());
            false
        }
        Err(err) => {
            log::debug!("{} -D {}: {}", program, serial, err);
            false
        }
    }
}

/// Hint shown when no supported package manager is present
pub fn manual_install_hint(os: HostOs) -> &'static str {
    match os {
        HostOs::MacOs => "Install Homebrew from https://brew.sh, then run `brew install android-platform-tools openssl`",
        HostOs::Windows => "Install Android SDK Platform-Tools and OpenSSL, then add both to PATH",
        _ => "Install adb (Android SDK Platform-Tools) and openssl with your system package manager",
    }
}
