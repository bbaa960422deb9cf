//! Device selection
//!
//! Picks exactly one device from the bridge listing, or refuses.

use crate::domain::entities::{AttachedDevice, ConnectivityState};
use crate::error::{DeployError, DeployResult, DeployStep};

/// Choose the device to work on.
///
/// With `requested`, that serial must be attached and authorized. Without
/// it, exactly one connected device must be present; several is
/// `AmbiguousDevice` and the first is never picked silently.
pub fn select_device(devices: &[AttachedDevice], requested: Option<&str>) -> DeployResult<String> {
    if let Some(serial) = requested {
        return match devices.iter().find(|d| d.serial == serial) {
            Some(device) if device.is_usable() => Ok(device.serial.clone()),
            Some(device) => Err(unreachable(serial, describe_state(device.state))),
            None => Err(unreachable(serial, "not attached".to_string())),
        };
    }

    let usable: Vec<&AttachedDevice> = devices.iter().filter(|d| d.is_usable()).collect();
    match usable.as_slice() {
        [only] => Ok(only.serial.clone()),
        [] => {
            let detail = match devices.first() {
                Some(device) => describe_state(device.state),
                None => "no devices attached".to_string(),
            };
            let serial = devices
                .first()
                .map(|d| d.serial.clone())
                .unwrap_or_else(|| "-".to_string());
            Err(unreachable(&serial, detail))
        }
        many => Err(DeployError::AmbiguousDevice {
            candidates: many.iter().map(|d| d.serial.clone()).collect(),
        }),
    }
}

fn describe_state(state: ConnectivityState) -> String {
    match state {
        ConnectivityState::Unauthorized => {
            "unauthorized; accept the debugging prompt on the device".to_string()
        }
        other => other.as_str().to_string(),
    }
}

fn unreachable(serial: &str, detail: String) -> DeployError {
    DeployError::DeviceUnreachable {
        serial: serial.to_string(),
        step: DeployStep::Select,
        detail,
    }
}
