//! Deployment Engine Tests

use super::*;
use crate::application::CancelToken;
use crate::domain::entities::{AttachedDevice, ConnectivityState, RootAccess};
use crate::domain::ports::{
    ArtifactSource, Bridge, CertEncoding, CertToolkit, DeployEvent, DeployEventSink,
};
use crate::domain::services::{shell, CertIdentifier, PreparedCertificate};
use crate::domain::value_objects::{Architecture, CommandResult, ContentHash, DeployStage};
use crate::error::{DeployError, DeployResult, DeployStep};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const STORE_PATH: &str = "/system/etc/security/cacerts/9a5ba575.0";
const FRIDA_PATH: &str = "/data/local/tmp/frida-server";
const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIBburp\n-----END CERTIFICATE-----\n";

// Fake device reachable through the Bridge port

struct DeviceState {
    adbd_root_allowed: bool,
    adbd_rooted: bool,
    su_available: bool,
    abi: String,
    system_writable: bool,
    remount_allowed: bool,
    remount_times_out: bool,
    getprop_fails: bool,
    files: HashMap<String, Vec<u8>>,
    sha256sum: bool,
    corrupt_push: bool,
    running: bool,
    launch_works: bool,
    selinux_ok: bool,
    chmod_ok: bool,
}

struct FakeDevice {
    devices: Vec<AttachedDevice>,
    state: RefCell<DeviceState>,
    calls: RefCell<Vec<String>>,
    cancel_on: Option<(String, CancelToken)>,
}

impl FakeDevice {
    fn new() -> Self {
        Self {
            devices: vec![AttachedDevice::new(
                "emulator-5554",
                ConnectivityState::Connected,
            )],
            state: RefCell::new(DeviceState {
                adbd_root_allowed: true,
                adbd_rooted: false,
                su_available: false,
                abi: "arm64-v8a".to_string(),
                system_writable: false,
                remount_allowed: true,
                remount_times_out: false,
                getprop_fails: false,
                files: HashMap::new(),
                sha256sum: true,
                corrupt_push: false,
                running: false,
                launch_works: true,
                selinux_ok: true,
                chmod_ok: true,
            }),
            calls: RefCell::new(Vec::new()),
            cancel_on: None,
        }
    }

    fn with(self, f: impl FnOnce(&mut DeviceState)) -> Self {
        f(&mut self.state.borrow_mut());
        self
    }

    fn with_devices(mut self, serials: &[&str]) -> Self {
        self.devices = serials
            .iter()
            .map(|s| AttachedDevice::new(*s, ConnectivityState::Connected))
            .collect();
        self
    }

    fn cancel_when(mut self, needle: &str, token: CancelToken) -> Self {
        self.cancel_on = Some((needle.to_string(), token));
        self
    }

    fn record(&self, call: String) {
        if let Some((needle, token)) = &self.cancel_on {
            if call.contains(needle.as_str()) {
                token.cancel();
            }
        }
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.borrow().files.get(path).cloned()
    }

    fn writable(&self) -> bool {
        self.state.borrow().system_writable
    }

    fn run(&self, command: &str) -> CommandResult {
        let mut state = self.state.borrow_mut();
        let (as_root, command) = match shell::strip_su(command) {
            Some(_) if !state.su_available => {
                return CommandResult::failed(127, "/system/bin/sh: su: not found")
            }
            Some(inner) => (true, inner),
            None => (state.adbd_rooted, command.to_string()),
        };
        let words: Vec<String> = command.split_whitespace().map(shell::unquote).collect();
        let last = words.last().cloned().unwrap_or_default();
        let protected = |path: &str| path.starts_with("/system");

        match words.first().map(String::as_str) {
            Some("id") => CommandResult::ok(if as_root { "0\n" } else { "2000\n" }),
            Some("getprop") if state.getprop_fails => {
                CommandResult::failed(1, "getprop: permission denied")
            }
            Some("getprop") => CommandResult::ok(format!("{}\n", state.abi)),
            Some("cat") => {
                let mode = if state.system_writable { "rw" } else { "ro" };
                CommandResult::ok(format!(
                    "/dev/block/dm-0 /system ext4 {},seclabel 0 0\n/dev/block/dm-3 /data f2fs rw 0 0\n",
                    mode
                ))
            }
            Some("mount") if words.get(2).map(String::as_str) == Some("rw,remount") => {
                if as_root && state.remount_allowed {
                    state.system_writable = true;
                    CommandResult::ok("")
                } else {
                    CommandResult::failed(1, "mount: '/system' not user mountable")
                }
            }
            Some("mount") => {
                if as_root {
                    state.system_writable = false;
                    CommandResult::ok("")
                } else {
                    CommandResult::failed(1, "mount: Permission denied")
                }
            }
            Some("chmod") | Some("chown") => {
                if !state.chmod_ok || (protected(&last) && !as_root) {
                    CommandResult::failed(1, format!("{}: Operation not permitted", words[0]))
                } else if state.files.contains_key(&last) {
                    CommandResult::ok("")
                } else {
                    CommandResult::failed(1, "No such file or directory")
                }
            }
            Some("sha256sum") if !state.sha256sum => {
                CommandResult::failed(127, "sha256sum: not found")
            }
            Some("sha256sum") => match state.files.get(&last) {
                Some(bytes) => CommandResult::ok(format!(
                    "{}  {}\n",
                    ContentHash::from_bytes(bytes).hex(),
                    last
                )),
                None => CommandResult::failed(1, "No such file or directory"),
            },
            Some("cp") => {
                let source = words[1].clone();
                if protected(&last) && !(as_root && state.system_writable) {
                    return CommandResult::failed(1, "cp: Read-only file system");
                }
                match state.files.get(&source).cloned() {
                    Some(bytes) => {
                        state.files.insert(last, bytes);
                        CommandResult::ok("")
                    }
                    None => CommandResult::failed(1, "cp: No such file or directory"),
                }
            }
            Some("rm") => {
                state.files.remove(&last);
                CommandResult::ok("")
            }
            Some("pidof") if state.running => CommandResult::ok("1234\n"),
            Some("pidof") => CommandResult::failed(1, ""),
            Some("pkill") => {
                state.running = false;
                CommandResult::ok("")
            }
            Some("setenforce") if as_root && state.selinux_ok => CommandResult::ok(""),
            Some("setenforce") => {
                CommandResult::failed(1, "setenforce: Couldn't set enforcing status to '0'")
            }
            Some("nohup") => {
                if state.launch_works && state.files.contains_key(&words[1]) {
                    state.running = true;
                }
                CommandResult::ok("")
            }
            _ => CommandResult::failed(127, format!("{}: not found", command)),
        }
    }
}

impl Bridge for FakeDevice {
    fn list_devices(&self) -> DeployResult<Vec<AttachedDevice>> {
        self.record("devices".to_string());
        Ok(self.devices.clone())
    }

    fn shell(&self, _serial: &str, command: &str) -> DeployResult<CommandResult> {
        self.record(format!("shell {}", command));
        Ok(self.run(command))
    }

    fn push(&self, _serial: &str, local: &Path, remote: &str) -> DeployResult<CommandResult> {
        self.record(format!("push {}", remote));
        let mut state = self.state.borrow_mut();
        let allowed = !remote.starts_with("/system") || (state.adbd_rooted && state.system_writable);
        if !allowed {
            return Err(DeployError::PushFailed {
                local: local.to_path_buf(),
                remote: remote.to_string(),
                detail: "Read-only file system".to_string(),
            });
        }
        let mut bytes = fs::read(local)?;
        if state.corrupt_push {
            bytes.push(0);
        }
        state.files.insert(remote.to_string(), bytes);
        Ok(CommandResult::ok("1 file pushed"))
    }

    fn root(&self, serial: &str) -> DeployResult<CommandResult> {
        self.record("root".to_string());
        let mut state = self.state.borrow_mut();
        if state.adbd_root_allowed {
            state.adbd_rooted = true;
            Ok(CommandResult::ok("restarting adbd as root"))
        } else {
            Err(DeployError::RootRequired {
                serial: serial.to_string(),
                detail: "adbd cannot run as root in production builds".to_string(),
            })
        }
    }

    fn remount(&self, serial: &str, writable: bool) -> DeployResult<CommandResult> {
        self.record(format!("remount {}", if writable { "rw" } else { "ro" }));
        let mut state = self.state.borrow_mut();
        if !writable {
            state.system_writable = false;
            return Ok(CommandResult::ok(""));
        }
        if state.adbd_rooted && state.remount_allowed {
            state.system_writable = true;
            if state.remount_times_out {
                return Err(DeployError::BridgeTimeout {
                    command: "adb -s emulator-5554 remount".to_string(),
                    step: DeployStep::Remount,
                    secs: 120,
                });
            }
            Ok(CommandResult::ok("remount succeeded"))
        } else {
            Err(DeployError::RemountDenied {
                serial: serial.to_string(),
                detail: "remount failed".to_string(),
            })
        }
    }

    fn reboot(&self, _serial: &str) -> DeployResult<CommandResult> {
        self.record("reboot".to_string());
        Ok(CommandResult::ok(""))
    }
}

// Certificate toolkit that accepts PEM and hashes every input to 9a5ba575

struct FixedHashToolkit;

impl CertToolkit for FixedHashToolkit {
    fn to_pem(&self, input: &Path, output: &Path, encoding: CertEncoding) -> DeployResult<CommandResult> {
        if encoding == CertEncoding::Der {
            return Ok(CommandResult::failed(1, "unable to load certificate"));
        }
        fs::copy(input, output)?;
        Ok(CommandResult::ok(""))
    }

    fn subject_hash_old(&self, _pem: &Path) -> DeployResult<CommandResult> {
        Ok(CommandResult::ok("9a5ba575\n"))
    }
}

fn prepared_certificate() -> (TempDir, PreparedCertificate) {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("ca.pem");
    fs::write(&source, PEM).unwrap();
    let prepared = CertIdentifier::new(&FixedHashToolkit).prepare(&source).unwrap();
    (dir, prepared)
}

// Artifact source writing a per-arch stub binary

struct StubSource {
    dir: TempDir,
    requested: RefCell<Vec<Architecture>>,
}

impl StubSource {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl ArtifactSource for StubSource {
    fn obtain(&self, arch: Architecture) -> DeployResult<PathBuf> {
        self.requested.borrow_mut().push(arch);
        let path = self.dir.path().join(format!("frida-server-{}", arch));
        fs::write(&path, format!("ELF {}", arch))?;
        Ok(path)
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

#[derive(Default)]
struct RecordingEventSink {
    events: Mutex<Vec<DeployEvent>>,
}

impl DeployEventSink for RecordingEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn frida_options() -> FridaOptions {
    FridaOptions::new().with_verify(3, Duration::ZERO)
}

fn install(engine: &DeploymentEngine<FakeDevice>) -> DeployResult<DeployReport> {
    let (_dir, prepared) = prepared_certificate();
    let mut session = engine.select_device(None)?;
    engine.install_certificate(&mut session, &prepared, &CertInstallOptions::new())
}

// === Device selection ===

#[test]
fn two_devices_without_serial_fail_before_any_device_command() {
    let engine = DeploymentEngine::new(
        FakeDevice::new().with_devices(&["emulator-5554", "R58M123"]),
    );
    let err = install(&engine).unwrap_err();

    assert!(matches!(err, DeployError::AmbiguousDevice { .. }));
    assert_eq!(engine.bridge().calls(), vec!["devices"]);
}

#[test]
fn select_all_returns_every_connected_device() {
    let engine = DeploymentEngine::new(
        FakeDevice::new().with_devices(&["emulator-5554", "R58M123"]),
    );
    let sessions = engine.select_all().unwrap();
    let serials: Vec<&str> = sessions.iter().map(|s| s.serial()).collect();
    assert_eq!(serials, vec!["emulator-5554", "R58M123"]);
}

#[test]
fn select_all_with_no_devices_is_unreachable() {
    let engine = DeploymentEngine::new(FakeDevice::new().with_devices(&[]));
    assert_eq!(engine.select_all().unwrap_err().exit_code(), 11);
}

// === Certificate install ===

#[test]
fn certificate_lands_in_store_and_partition_is_restored() {
    let engine = DeploymentEngine::new(FakeDevice::new());
    let report = install(&engine).unwrap();
    let device = engine.bridge();

    assert_eq!(report.remote_path, STORE_PATH);
    assert_eq!(report.store_filename.as_ref().unwrap().file_name(), "9a5ba575.0");
    assert_eq!(device.file(STORE_PATH).unwrap(), PEM.as_bytes());
    assert!(!device.writable());
    assert!(device.called("remount rw"));
    assert!(device.called("remount ro"));
    assert!(device.called("shell chmod 644 /system/etc/security/cacerts/9a5ba575.0"));
    assert!(device.called("shell chown root:root"));
    assert_eq!(
        report.stages,
        vec![
            DeployStage::Idle,
            DeployStage::DeviceSelected,
            DeployStage::Rooted,
            DeployStage::PartitionWritable,
            DeployStage::ArtifactPushed,
            DeployStage::PermissionsSet,
            DeployStage::PartitionRestored,
            DeployStage::Done,
        ]
    );
    assert!(!report.has_warnings());
}

#[test]
fn installing_same_certificate_twice_leaves_one_file() {
    let engine = DeploymentEngine::new(FakeDevice::new());
    install(&engine).unwrap();
    install(&engine).unwrap();

    let state = engine.bridge().state.borrow();
    let store_files: Vec<&String> = state
        .files
        .keys()
        .filter(|k| k.starts_with("/system/etc/security/cacerts/"))
        .collect();
    assert_eq!(store_files, vec![STORE_PATH]);
    assert_eq!(state.files[STORE_PATH], PEM.as_bytes());
}

#[test]
fn writable_partition_is_left_alone() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.system_writable = true));
    install(&engine).unwrap();

    assert!(!engine.bridge().called("remount"));
    assert!(engine.bridge().writable());
}

#[test]
fn no_root_means_no_push_or_remount() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.adbd_root_allowed = false));
    let err = install(&engine).unwrap_err();

    assert!(matches!(err, DeployError::RootRequired { .. }));
    assert!(err.to_string().contains("production builds"));
    assert!(!engine.bridge().called("push"));
    assert!(!engine.bridge().called("remount"));
    assert!(!engine.bridge().called("shell mount"));
}

#[test]
fn su_root_stages_certificate_and_copies_as_root() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| {
        s.adbd_root_allowed = false;
        s.su_available = true;
    }));
    let (_dir, prepared) = prepared_certificate();
    let mut session = engine.select_device(None).unwrap();
    engine
        .install_certificate(&mut session, &prepared, &CertInstallOptions::new())
        .unwrap();
    let device = engine.bridge();

    assert_eq!(session.root(), Some(RootAccess::Su));
    assert!(device.called("push /data/local/tmp/9a5ba575.0"));
    assert!(device.called(
        "shell su -c 'cp /data/local/tmp/9a5ba575.0 /system/etc/security/cacerts/9a5ba575.0'"
    ));
    assert!(device.called("shell su -c 'mount -o rw,remount /system'"));
    assert!(device.called("shell su -c 'mount -o ro,remount /system'"));
    assert!(device.file("/data/local/tmp/9a5ba575.0").is_none());
    assert_eq!(device.file(STORE_PATH).unwrap(), PEM.as_bytes());
    assert!(!device.writable());
}

#[test]
fn remount_refusal_is_remount_denied() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.remount_allowed = false));
    let err = install(&engine).unwrap_err();

    assert_eq!(err.exit_code(), 14);
    assert!(!engine.bridge().called("push"));
}

#[test]
fn failure_after_remount_still_restores_partition() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.chmod_ok = false));
    let err = install(&engine).unwrap_err();

    assert!(matches!(err, DeployError::PermissionDenied { .. }));
    assert!(engine.bridge().called("remount ro"));
    assert!(!engine.bridge().writable());
}

#[test]
fn remount_error_after_partition_went_writable_still_restores() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.remount_times_out = true));
    let err = install(&engine).unwrap_err();

    assert_eq!(err.exit_code(), 20);
    assert!(!engine.bridge().called("push"));
    assert!(engine.bridge().called("remount ro"));
    assert!(!engine.bridge().writable());
}

#[test]
fn refused_remount_restore_attempt_is_harmless() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.remount_allowed = false));
    let err = install(&engine).unwrap_err();

    assert_eq!(err.exit_code(), 14);
    assert!(!engine.bridge().writable());
}

#[test]
fn interrupt_after_remount_restores_partition() {
    let cancel = CancelToken::new();
    let engine = DeploymentEngine::new(FakeDevice::new().cancel_when("remount rw", cancel.clone()))
        .with_cancel_token(cancel);
    let err = install(&engine).unwrap_err();

    assert!(matches!(err, DeployError::Interrupted { step: DeployStep::Push }));
    assert_eq!(err.exit_code(), 130);
    assert!(!engine.bridge().called("push"));
    assert!(!engine.bridge().writable());
}

#[test]
fn digest_mismatch_is_push_failed() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.corrupt_push = true));
    let err = install(&engine).unwrap_err();

    assert!(err.to_string().contains("digest mismatch"));
    assert!(!engine.bridge().writable());
}

#[test]
fn missing_sha256sum_skips_digest_check() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| {
        s.sha256sum = false;
        s.corrupt_push = true;
    }));
    assert!(install(&engine).is_ok());
}

#[test]
fn reboot_after_install_when_requested() {
    let engine = DeploymentEngine::new(FakeDevice::new());
    let (_dir, prepared) = prepared_certificate();
    let mut session = engine.select_device(None).unwrap();
    let report = engine
        .install_certificate(
            &mut session,
            &prepared,
            &CertInstallOptions::new().with_reboot(true),
        )
        .unwrap();

    assert!(report.rebooted);
    let calls = engine.bridge().calls();
    let restore = calls.iter().position(|c| c == "remount ro").unwrap();
    let reboot = calls.iter().position(|c| c == "reboot").unwrap();
    assert!(restore < reboot);
}

// === Binary deployment ===

#[test]
fn arm64_device_gets_arm64_binary_and_it_runs() {
    let engine = DeploymentEngine::new(FakeDevice::new());
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let report = engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap();
    let device = engine.bridge();

    assert_eq!(source.requested.borrow().as_slice(), [Architecture::Arm64]);
    assert_eq!(report.architecture, Some(Architecture::Arm64));
    assert_eq!(session.architecture(), Some(Architecture::Arm64));
    assert_eq!(device.file(FRIDA_PATH).unwrap(), b"ELF arm64");
    assert!(device.called("shell chmod 755 /data/local/tmp/frida-server"));
    assert!(device.called("shell setenforce 0"));
    assert_eq!(report.running_pids.as_deref(), Some("1234"));
    assert!(!report.restarted);
    assert!(report.is_verified());
    assert_eq!(
        report.stages,
        vec![
            DeployStage::Idle,
            DeployStage::DeviceSelected,
            DeployStage::Rooted,
            DeployStage::ArchitectureResolved,
            DeployStage::ArtifactPushed,
            DeployStage::PermissionsSet,
            DeployStage::Done,
        ]
    );
}

#[test]
fn running_binary_is_stopped_before_push_and_restarted() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.running = true));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let report = engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap();

    assert!(report.restarted);
    let calls = engine.bridge().calls();
    let stop = calls.iter().position(|c| c.starts_with("shell pkill -f")).unwrap();
    let push = calls.iter().position(|c| c.starts_with("push")).unwrap();
    assert!(stop < push);
    assert!(engine.bridge().state.borrow().running);
}

#[test]
fn liveness_failure_is_warning_not_failure() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.launch_works = false));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let report = engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap();

    assert!(!report.is_verified());
    let pidof_checks = engine
        .bridge()
        .calls()
        .iter()
        .filter(|c| c.starts_with("shell pidof"))
        .count();
    // one pre-push check plus three liveness checks
    assert_eq!(pidof_checks, 4);
    assert_eq!(report.strict_failure().unwrap().exit_code(), 19);
}

#[test]
fn failing_abi_query_is_unreachable_not_unknown() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.getprop_fails = true));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let err = engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::DeviceUnreachable { step: DeployStep::Architecture, .. }
    ));
    assert_eq!(err.exit_code(), 11);
    assert!(source.requested.borrow().is_empty());
    assert!(!engine.bridge().called("push"));
}

#[test]
fn unknown_abi_without_fallback_is_unsupported() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.abi = "mips".to_string()));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let err = engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap_err();

    assert!(matches!(err, DeployError::UnsupportedArchitecture { .. }));
    assert!(source.requested.borrow().is_empty());
    assert!(!engine.bridge().called("push"));
}

#[test]
fn unknown_abi_with_fallback_deploys_with_warning() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.abi = String::new()));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let options = frida_options().with_fallback_arch(Some(Architecture::Arm));
    let report = engine.deploy_binary(&mut session, &source, &options).unwrap();

    assert_eq!(report.architecture, Some(Architecture::Arm));
    assert_eq!(report.warnings[0].kind, WarningKind::Architecture);
}

#[test]
fn selinux_failure_is_warning() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.selinux_ok = false));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let report = engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap();

    assert!(report.warnings.iter().any(|w| w.kind == WarningKind::Selinux));
    assert!(report.is_verified());
}

#[test]
fn no_start_skips_launch() {
    let engine = DeploymentEngine::new(FakeDevice::new());
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    let report = engine
        .deploy_binary(&mut session, &source, &frida_options().with_start(false))
        .unwrap();

    assert!(!engine.bridge().called("shell nohup"));
    assert!(!engine.bridge().called("shell setenforce"));
    assert!(report.running_pids.is_none());
}

#[test]
fn su_root_launch_is_wrapped() {
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| {
        s.adbd_root_allowed = false;
        s.su_available = true;
    }));
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap();

    assert!(engine.bridge().called("push /data/local/tmp/frida-server"));
    assert!(engine
        .bridge()
        .called("shell su -c 'nohup /data/local/tmp/frida-server >/dev/null 2>&1 &'"));
}

#[test]
fn events_follow_the_run() {
    let sink = Arc::new(RecordingEventSink::default());
    let engine = DeploymentEngine::new(FakeDevice::new()).with_events(sink.clone());
    let source = StubSource::new();
    let mut session = engine.select_device(None).unwrap();
    engine
        .deploy_binary(&mut session, &source, &frida_options())
        .unwrap();

    let events = sink.events.lock().unwrap();
    assert!(matches!(events.first(), Some(DeployEvent::Started { .. })));
    assert!(matches!(events.last(), Some(DeployEvent::Completed { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, DeployEvent::Command { command, .. } if command == "getprop ro.product.cpu.abi")));
}

#[test]
fn failed_run_emits_failed_event() {
    let sink = Arc::new(RecordingEventSink::default());
    let engine = DeploymentEngine::new(FakeDevice::new().with(|s| s.adbd_root_allowed = false))
        .with_events(sink.clone());
    assert!(install(&engine).is_err());

    let events = sink.events.lock().unwrap();
    assert!(matches!(
        events.last(),
        Some(DeployEvent::Failed { step: DeployStep::Root, .. })
    ));
}
