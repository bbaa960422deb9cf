//! Device Session entity
//!
//! One attached device over the bridge. Created by device selection and
//! passed explicitly through every engine step.

use crate::domain::value_objects::Architecture;

/// Connectivity as reported by the bridge (and upgraded once rooted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Disconnected,
    Connected,
    AuthorizedRoot,
    Unauthorized,
}

impl ConnectivityState {
    /// Map the state column of `adb devices`
    pub fn from_bridge_state(state: &str) -> Self {
        match state.trim() {
            "device" => ConnectivityState::Connected,
            "unauthorized" => ConnectivityState::Unauthorized,
            _ => ConnectivityState::Disconnected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::Disconnected => "disconnected",
            ConnectivityState::Connected => "connected",
            ConnectivityState::AuthorizedRoot => "root",
            ConnectivityState::Unauthorized => "unauthorized",
        }
    }
}

/// How root was obtained on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootAccess {
    /// adbd restarted as root; shell commands already run as uid 0
    Adbd,
    /// commands must be wrapped in `su -c`
    Su,
}

/// A device as listed by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedDevice {
    pub serial: String,
    pub state: ConnectivityState,
}

impl AttachedDevice {
    pub fn new(serial: impl Into<String>, state: ConnectivityState) -> Self {
        Self {
            serial: serial.into(),
            state,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.state == ConnectivityState::Connected
    }
}

/// Session for one selected device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSession {
    serial: String,
    state: ConnectivityState,
    architecture: Option<Architecture>,
    root: Option<RootAccess>,
}

impl DeviceSession {
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            state: ConnectivityState::Connected,
            architecture: None,
            root: None,
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn architecture(&self) -> Option<Architecture> {
        self.architecture
    }

    pub fn root(&self) -> Option<RootAccess> {
        self.root
    }

    pub fn mark_rooted(&mut self, access: RootAccess) {
        self.root = Some(access);
        self.state = ConnectivityState::AuthorizedRoot;
    }

    pub fn set_architecture(&mut self, arch: Architecture) {
        self.architecture = Some(arch);
    }

    pub fn mark_disconnected(&mut self) {
        self.state = ConnectivityState::Disconnected;
    }

    /// Wrap a shell command so it runs as root on this session
    pub fn privileged(&self, command: &str) -> String {
        match self.root {
            Some(RootAccess::Su) => crate::domain::services::shell::su(command),
            _ => command.to_string(),
        }
    }
}
