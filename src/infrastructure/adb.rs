//! adb Bridge
//!
//! Implements the `Bridge` port on top of the `adb` executable. Every
//! device-scoped call is issued as `adb -s <serial> ...`.

use std::path::Path;

use crate::domain::entities::{AttachedDevice, ConnectivityState, SYSTEM_MOUNT_POINTS};
use crate::domain::ports::{Bridge, CommandRunner};
use crate::domain::services::shell;
use crate::domain::value_objects::CommandResult;
use crate::error::{DeployError, DeployResult, DeployStep};
use crate::infrastructure::process::{locate_program, process_error};

/// adb reports these (on stderr, exit 1) when the device is gone
const DEVICE_GONE_MARKERS: &[&str] = &[
    "error: device offline",
    "error: device unauthorized",
    "error: no devices/emulators found",
    "error: device not found",
    "error: closed",
];

const PRODUCTION_BUILD: &str = "cannot run as root in production builds";

/// Output fragments of a refused `adb remount`
const REMOUNT_REFUSALS: &[&str] = &[
    "remount failed",
    "not running as root",
    "permission denied",
    "verity is enabled",
    "reboot your device",
];

pub struct AdbBridge<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> AdbBridge<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// Resolve `program` on PATH (or as a path) before using it
    pub fn locate(runner: R, program: &str) -> DeployResult<Self> {
        let path = locate_program(program)?;
        log::debug!("using adb at {}", path.display());
        Ok(Self::new(runner, path.to_string_lossy()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn invoke(&self, serial: Option<&str>, args: &[&str], step: DeployStep) -> DeployResult<CommandResult> {
        let mut full: Vec<String> = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = serial {
            full.push("-s".to_string());
            full.push(serial.to_string());
        }
        full.extend(args.iter().map(|a| a.to_string()));

        let result = self
            .runner
            .run(&self.program, &full)
            .map_err(|e| process_error(&self.program, e, step))?;

        if let Some(serial) = serial {
            if let Some(detail) = device_gone(&result) {
                return Err(DeployError::DeviceUnreachable {
                    serial: serial.to_string(),
                    step,
                    detail,
                });
            }
        }
        Ok(result)
    }
}

impl<R: CommandRunner> Bridge for AdbBridge<R> {
    fn list_devices(&self) -> DeployResult<Vec<AttachedDevice>> {
        let result = self.invoke(None, &["devices"], DeployStep::Select)?;
        if !result.success() {
            return Err(DeployError::BridgeUnavailable {
                program: self.program.clone(),
                detail: result.describe(),
            });
        }
        Ok(parse_devices(result.stdout()))
    }

    fn shell(&self, serial: &str, command: &str) -> DeployResult<CommandResult> {
        self.invoke(Some(serial), &["shell", command], DeployStep::Bridge)
    }

    fn push(&self, serial: &str, local: &Path, remote: &str) -> DeployResult<CommandResult> {
        let local_arg = local.to_string_lossy();
        let result = self.invoke(Some(serial), &["push", &local_arg, remote], DeployStep::Push)?;
        if !result.success() {
            return Err(DeployError::PushFailed {
                local: local.to_path_buf(),
                remote: remote.to_string(),
                detail: result.describe(),
            });
        }
        Ok(result)
    }

    fn root(&self, serial: &str) -> DeployResult<CommandResult> {
        let result = self.invoke(Some(serial), &["root"], DeployStep::Root)?;
        let output = result.combined();
        if output.contains(PRODUCTION_BUILD) {
            return Err(DeployError::RootRequired {
                serial: serial.to_string(),
                detail: format!("adbd {}", PRODUCTION_BUILD),
            });
        }
        if !result.success() {
            return Err(DeployError::RootRequired {
                serial: serial.to_string(),
                detail: format!("adb root: {}", result.describe()),
            });
        }
        if !output.contains("already running as root") {
            // adbd restarts; the device drops off the bus for a moment.
            self.invoke(Some(serial), &["wait-for-device"], DeployStep::Root)?;
        }
        Ok(result)
    }

    fn remount(&self, serial: &str, writable: bool) -> DeployResult<CommandResult> {
        if writable {
            let result = self.invoke(Some(serial), &["remount"], DeployStep::Remount)?;
            let output = result.combined().to_ascii_lowercase();
            let refused = REMOUNT_REFUSALS.iter().find(|m| output.contains(*m));
            if !result.success() || refused.is_some() {
                let detail = match refused {
                    Some(&"reboot your device") => {
                        "verity was just disabled; reboot the device and run again".to_string()
                    }
                    _ => result.describe(),
                };
                return Err(DeployError::RemountDenied {
                    serial: serial.to_string(),
                    detail,
                });
            }
            return Ok(result);
        }

        let mut last = CommandResult::default();
        for point in SYSTEM_MOUNT_POINTS {
            let result = self.shell(serial, &shell::remount(point, false))?;
            if result.success() {
                return Ok(result);
            }
            last = result;
        }
        Err(DeployError::RemountDenied {
            serial: serial.to_string(),
            detail: format!("read-only remount: {}", last.describe()),
        })
    }

    fn reboot(&self, serial: &str) -> DeployResult<CommandResult> {
        self.invoke(Some(serial), &["reboot"], DeployStep::Bridge)
    }
}

/// Parse `adb devices` output into serial/state pairs
pub fn parse_devices(output: &str) -> Vec<AttachedDevice> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            let state = fields.next()?;
            Some(AttachedDevice::new(
                serial,
                ConnectivityState::from_bridge_state(state),
            ))
        })
        .collect()
}

fn device_gone(result: &CommandResult) -> Option<String> {
    if result.success() {
        return None;
    }
    let stderr = result.stderr();
    stderr
        .lines()
        .map(str::trim)
        .find(|line| {
            DEVICE_GONE_MARKERS.iter().any(|m| line.starts_with(m))
                || (line.starts_with("error: device '") && line.ends_with("not found"))
        })
        .map(|line| line.trim_start_matches("error: ").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ProcessError;
    use crate::infrastructure::process::RecordingRunner;

    fn bridge(runner: RecordingRunner) -> AdbBridge<RecordingRunner> {
        AdbBridge::new(runner, "adb")
    }

    #[test]
    fn parses_device_listing() {
        let output = "\
* daemon not running; starting now at tcp:5037
* daemon started successfully
List of devices attached
emulator-5554\tdevice
R58M123ABC\tunauthorized
192.168.1.7:5555\toffline

";
        let devices = parse_devices(output);
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].serial, "emulator-5554");
        assert!(devices[0].is_usable());
        assert_eq!(devices[1].state, ConnectivityState::Unauthorized);
        assert_eq!(devices[2].state, ConnectivityState::Disconnected);
    }

    #[test]
    fn empty_listing_is_valid() {
        assert!(parse_devices("List of devices attached\n\n").is_empty());
    }

    #[test]
    fn commands_carry_serial() {
        let adb = bridge(RecordingRunner::new().on("getprop", CommandResult::ok("x86_64\n")));
        let result = adb.shell("emulator-5554", "getprop ro.product.cpu.abi").unwrap();

        assert_eq!(result.first_line(), Some("x86_64"));
        assert_eq!(
            adb.runner().calls(),
            vec!["adb -s emulator-5554 shell \"getprop ro.product.cpu.abi\""]
        );
    }

    #[test]
    fn vanished_device_is_unreachable() {
        let adb = bridge(RecordingRunner::new().on(
            "shell",
            CommandResult::failed(1, "error: device 'emulator-5554' not found\n"),
        ));
        let err = adb.shell("emulator-5554", "id -u").unwrap_err();
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn shell_nonzero_is_not_an_error() {
        let adb = bridge(RecordingRunner::new().on(
            "sha256sum",
            CommandResult::failed(127, "/system/bin/sh: sha256sum: not found"),
        ));
        let result = adb.shell("emulator-5554", "sha256sum /x").unwrap();
        assert_eq!(result.exit_code(), Some(127));
    }

    #[test]
    fn production_build_refuses_root_even_with_exit_zero() {
        let adb = bridge(
            RecordingRunner::new().on("root", CommandResult::ok("adbd cannot run as root in production builds\n")),
        );
        let err = adb.root("R58M123").unwrap_err();
        assert!(matches!(err, DeployError::RootRequired { .. }));
        assert!(!adb.runner().was_called("wait-for-device"));
    }

    #[test]
    fn root_waits_for_device_after_restart() {
        let adb = bridge(RecordingRunner::new().on("root", CommandResult::ok("restarting adbd as root\n")));
        adb.root("emulator-5554").unwrap();
        assert_eq!(
            adb.runner().calls(),
            vec![
                "adb -s emulator-5554 root",
                "adb -s emulator-5554 wait-for-device"
            ]
        );
    }

    #[test]
    fn root_skips_wait_when_already_root() {
        let adb = bridge(
            RecordingRunner::new().on("root", CommandResult::ok("adbd is already running as root\n")),
        );
        adb.root("emulator-5554").unwrap();
        assert!(!adb.runner().was_called("wait-for-device"));
    }

    #[test]
    fn remount_refusal_is_denied() {
        let adb = bridge(RecordingRunner::new().on(
            "remount",
            CommandResult::ok("Not running as root. Try \"adb root\" first.\n"),
        ));
        let err = adb.remount("emulator-5554", true).unwrap_err();
        assert_eq!(err.exit_code(), 14);
    }

    #[test]
    fn remount_needing_reboot_is_denied_with_hint() {
        let adb = bridge(RecordingRunner::new().on(
            "remount",
            CommandResult::ok("Successfully disabled verification\nNow reboot your device for settings to take effect\n"),
        ));
        let err = adb.remount("emulator-5554", true).unwrap_err();
        assert!(err.to_string().contains("reboot the device"));
    }

    #[test]
    fn read_only_remount_falls_back_to_root_mount() {
        let adb = bridge(
            RecordingRunner::new()
                .on("ro,remount /system", CommandResult::failed(1, "mount: '/system' not in /proc/mounts"))
                .on("ro,remount /", CommandResult::ok("")),
        );
        adb.remount("emulator-5554", false).unwrap();
        assert_eq!(adb.runner().calls().len(), 2);
    }

    #[test]
    fn push_failure_is_push_failed() {
        let adb = bridge(RecordingRunner::new().on(
            "push",
            CommandResult::failed(1, "adb: error: failed to copy: Read-only file system"),
        ));
        let err = adb
            .push("emulator-5554", Path::new("9a5ba575.0"), "/system/etc/security/cacerts/9a5ba575.0")
            .unwrap_err();
        assert_eq!(err.exit_code(), 17);
    }

    #[test]
    fn timeout_is_attributed_to_step() {
        let adb = bridge(RecordingRunner::new().fail(
            "push",
            ProcessError::Timeout {
                command: "adb push".into(),
                secs: 120,
            },
        ));
        let err = adb
            .push("emulator-5554", Path::new("frida-server"), "/data/local/tmp/frida-server")
            .unwrap_err();
        assert!(matches!(err, DeployError::BridgeTimeout { step: DeployStep::Push, .. }));
        assert_eq!(err.exit_code(), 20);
    }

    #[test]
    fn missing_adb_is_bridge_unavailable() {
        let adb = bridge(RecordingRunner::new().fail(
            "devices",
            ProcessError::NotFound {
                program: "adb".into(),
            },
        ));
        let err = adb.list_devices().unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }
}
