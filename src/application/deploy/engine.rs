//! Deployment Engine
//!
//! Drives one device session through the install sequence:
//! 1. Acquire root (adbd root, else `su`)
//! 2. Resolve the architecture (binary runs)
//! 3. Make the system partition writable (certificate runs)
//! 4. Push and verify the artifact
//! 5. Set permissions and ownership
//! 6. Restore the partition, whatever happened in 3-5
//! 7. Reboot (certificate) or launch and verify (binary)
//!
//! The engine is the only stateful coordinator. Each run owns its
//! `PartitionMountState`; nothing is shared between sessions.

use std::fs;
use std::sync::Arc;
use std::thread;

use crate::application::cancel::CancelToken;
use crate::domain::entities::{
    AttachedDevice, DeploymentArtifact, DeviceSession, PartitionMountState, RootAccess,
    SYSTEM_MOUNT_POINTS,
};
use crate::domain::ports::{
    ArtifactSource, Bridge, DeployEvent, DeployEventSink, DeployTask, NoopEventSink,
};
use crate::domain::services::{arch_resolver, select_device, shell, PreparedCertificate};
use crate::domain::value_objects::{CommandResult, ContentHash, DeployStage};
use crate::error::{DeployError, DeployResult, DeployStep};

use super::options::{CertInstallOptions, FridaOptions};
use super::result::{DeployReport, DeployWarning, WarningKind};

/// Progress of one run; folded into the report at the end
struct Run {
    serial: String,
    stages: Vec<DeployStage>,
    warnings: Vec<DeployWarning>,
}

pub struct DeploymentEngine<B: Bridge> {
    bridge: B,
    events: Arc<dyn DeployEventSink>,
    cancel: CancelToken,
}

impl<B: Bridge> DeploymentEngine<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            events: Arc::new(NoopEventSink),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Attached devices as the bridge lists them
    pub fn devices(&self) -> DeployResult<Vec<AttachedDevice>> {
        self.bridge.list_devices()
    }

    /// `Idle -> DeviceSelected`
    pub fn select_device(&self, requested: Option<&str>) -> DeployResult<DeviceSession> {
        let devices = self.bridge.list_devices()?;
        let serial = select_device(&devices, requested)?;
        Ok(DeviceSession::new(serial))
    }

    /// Sessions for every connected device, in bridge order
    pub fn select_all(&self) -> DeployResult<Vec<DeviceSession>> {
        let devices = self.bridge.list_devices()?;
        let sessions: Vec<DeviceSession> = devices
            .iter()
            .filter(|d| d.is_usable())
            .map(|d| DeviceSession::new(d.serial.clone()))
            .collect();
        if sessions.is_empty() {
            // Same error a single selection would report.
            select_device(&devices, None)?;
        }
        Ok(sessions)
    }

    /// Install a prepared certificate into the system trust store
    pub fn install_certificate(
        &self,
        session: &mut DeviceSession,
        certificate: &PreparedCertificate,
        options: &CertInstallOptions,
    ) -> DeployResult<DeployReport> {
        let artifact = DeploymentArtifact::certificate(
            certificate.path(),
            &options.store_dir,
            certificate.name().clone(),
            certificate.digest().clone(),
        );
        let mut run = self.begin(session, DeployTask::Certificate);
        let mut report = DeployReport::new(session.serial(), artifact.remote_path());
        report.store_filename = Some(certificate.name().clone());

        let mut mount: Option<PartitionMountState> = None;
        let outcome = self.certificate_steps(session, &artifact, &mut mount, &mut run);
        self.restore_partition(session, mount.as_mut(), &mut run);
        if let Err(err) = outcome {
            return Err(self.fail(&mut run, err));
        }
        self.enter(&mut run, DeployStage::PartitionRestored);

        if options.reboot {
            if let Err(err) = self.checkpoint(DeployStep::Restore) {
                return Err(self.fail(&mut run, err));
            }
            self.command(session.serial(), "reboot");
            match self.bridge.reboot(session.serial()) {
                Ok(_) => {
                    report.rebooted = true;
                    session.mark_disconnected();
                }
                Err(err) => self.warn(&mut run, WarningKind::Reboot, DeployStep::Restore, err.to_string()),
            }
        }

        Ok(self.finish(run, report))
    }

    /// Deploy (and optionally start) a binary matching the device
    pub fn deploy_binary<S: ArtifactSource + ?Sized>(
        &self,
        session: &mut DeviceSession,
        source: &S,
        options: &FridaOptions,
    ) -> DeployResult<DeployReport> {
        let mut run = self.begin(session, DeployTask::Binary);
        let mut report = DeployReport::new(session.serial(), options.remote_path.as_str());
        match self.binary_steps(session, source, options, &mut run, &mut report) {
            Ok(()) => Ok(self.finish(run, report)),
            Err(err) => Err(self.fail(&mut run, err)),
        }
    }

    fn certificate_steps(
        &self,
        session: &mut DeviceSession,
        artifact: &DeploymentArtifact,
        mount: &mut Option<PartitionMountState>,
        run: &mut Run,
    ) -> DeployResult<()> {
        self.checkpoint(DeployStep::Root)?;
        self.acquire_root(session)?;
        self.enter(run, DeployStage::Rooted);

        self.checkpoint(DeployStep::Remount)?;
        let state = mount.insert(PartitionMountState::observed(self.system_writable(session)?));
        if state.is_writable() {
            log::debug!("{}: system partition already writable", session.serial());
        } else {
            state.mark_remount_attempted();
            self.make_writable(session)?;
        }
        self.enter(run, DeployStage::PartitionWritable);

        self.checkpoint(DeployStep::Push)?;
        self.push_artifact(session, artifact)?;
        self.enter(run, DeployStage::ArtifactPushed);

        self.checkpoint(DeployStep::Permission)?;
        self.set_permissions(session, artifact)?;
        self.enter(run, DeployStage::PermissionsSet);
        Ok(())
    }

    fn binary_steps<S: ArtifactSource + ?Sized>(
        &self,
        session: &mut DeviceSession,
        source: &S,
        options: &FridaOptions,
        run: &mut Run,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        self.checkpoint(DeployStep::Root)?;
        self.acquire_root(session)?;
        self.enter(run, DeployStage::Rooted);

        self.checkpoint(DeployStep::Architecture)?;
        self.command(session.serial(), shell::GET_ABI);
        let resolved = arch_resolver::resolve(&self.bridge, session.serial())?;
        let choice = arch_resolver::choose(
            session.serial(),
            &resolved,
            options.arch_override,
            options.fallback_arch,
        )?;
        if let Some(message) = choice.warning {
            self.warn(run, WarningKind::Architecture, DeployStep::Architecture, message);
        }
        session.set_architecture(choice.arch);
        report.architecture = Some(choice.arch);
        self.enter(run, DeployStage::ArchitectureResolved);

        self.checkpoint(DeployStep::Artifact)?;
        let local = source.obtain(choice.arch)?;
        let bytes = fs::read(&local).map_err(|e| DeployError::ArtifactUnavailable {
            detail: format!("cannot read {}: {}", local.display(), e),
        })?;
        let artifact = DeploymentArtifact::binary(
            local,
            options.remote_path.as_str(),
            choice.arch,
            ContentHash::from_bytes(&bytes),
        );
        log::info!(
            "{}: deploying {} ({}) to {}",
            session.serial(),
            source.describe(),
            choice.arch,
            artifact.remote_path()
        );

        self.checkpoint(DeployStep::Push)?;
        // A running binary keeps the file busy; stop it before pushing.
        if self.running_pids(session, options.process_name())?.is_some() {
            log::info!("{}: {} already running, restarting", session.serial(), options.process_name());
            let stop = self.root_shell(session, &shell::pkill(artifact.remote_path()), DeployStep::Push)?;
            if !stop.success() {
                log::debug!("pkill: {}", stop.describe());
            }
            report.restarted = true;
        }
        self.push_artifact(session, &artifact)?;
        self.enter(run, DeployStage::ArtifactPushed);

        self.checkpoint(DeployStep::Permission)?;
        self.set_permissions(session, &artifact)?;
        self.enter(run, DeployStage::PermissionsSet);

        if options.start {
            self.launch(session, &artifact, options, run, report)?;
        }
        Ok(())
    }

    /// `DeviceSelected -> Rooted`
    fn acquire_root(&self, session: &mut DeviceSession) -> DeployResult<RootAccess> {
        let serial = session.serial().to_string();
        self.command(&serial, "root");
        let adbd_detail = match self.bridge.root(&serial) {
            Ok(_) => {
                let uid = self.shell(&serial, shell::CURRENT_UID, DeployStep::Root)?;
                if uid.success() && uid.first_line() == Some("0") {
                    session.mark_rooted(RootAccess::Adbd);
                    log::info!("{}: root via adbd", serial);
                    return Ok(RootAccess::Adbd);
                }
                format!("adbd runs as uid {}", uid.first_line().unwrap_or("?"))
            }
            Err(DeployError::RootRequired { detail, .. }) => detail,
            Err(err) => return Err(err.at_step(DeployStep::Root)),
        };

        let su = self.shell(&serial, &shell::su(shell::CURRENT_UID), DeployStep::Root)?;
        if su.success() && su.first_line() == Some("0") {
            session.mark_rooted(RootAccess::Su);
            log::info!("{}: root via su", serial);
            return Ok(RootAccess::Su);
        }
        Err(DeployError::RootRequired {
            serial,
            detail: format!("{}; su: {}", adbd_detail, su.describe()),
        })
    }

    /// Read `/proc/mounts`; unreadable or unlisted counts as read-only
    fn system_writable(&self, session: &DeviceSession) -> DeployResult<bool> {
        let mounts = self.shell(session.serial(), shell::READ_MOUNTS, DeployStep::Remount)?;
        if !mounts.success() {
            log::debug!("cannot read /proc/mounts: {}", mounts.describe());
            return Ok(false);
        }
        Ok(PartitionMountState::parse_writable(mounts.stdout()).unwrap_or(false))
    }

    /// `Rooted -> PartitionWritable`
    fn make_writable(&self, session: &DeviceSession) -> DeployResult<()> {
        let serial = session.serial();
        match session.root() {
            Some(RootAccess::Su) => {
                let mut last: Option<CommandResult> = None;
                for point in SYSTEM_MOUNT_POINTS {
                    let result =
                        self.root_shell(session, &shell::remount(point, true), DeployStep::Remount)?;
                    if result.success() {
                        last = None;
                        break;
                    }
                    last = Some(result);
                }
                if let Some(result) = last {
                    return Err(DeployError::RemountDenied {
                        serial: serial.to_string(),
                        detail: result.describe(),
                    });
                }
            }
            _ => {
                self.command(serial, "remount");
                self.bridge
                    .remount(serial, true)
                    .map_err(|e| e.at_step(DeployStep::Remount))?;
            }
        }

        if !self.system_writable(session)? {
            return Err(DeployError::RemountDenied {
                serial: serial.to_string(),
                detail: "system partition still mounted read-only after remount".to_string(),
            });
        }
        Ok(())
    }

    /// `-> PartitionRestored`; failures become warnings
    fn restore_partition(
        &self,
        session: &DeviceSession,
        mount: Option<&mut PartitionMountState>,
        run: &mut Run,
    ) {
        let Some(state) = mount else { return };
        if !state.needs_restore() {
            return;
        }

        let serial = session.serial();
        let outcome = match session.root() {
            Some(RootAccess::Su) => {
                let mut outcome = Err(String::new());
                for point in SYSTEM_MOUNT_POINTS {
                    match self.root_shell(session, &shell::remount(point, false), DeployStep::Restore) {
                        Ok(result) if result.success() => {
                            outcome = Ok(());
                            break;
                        }
                        Ok(result) => outcome = Err(result.describe()),
                        Err(err) => outcome = Err(err.to_string()),
                    }
                }
                outcome
            }
            _ => {
                self.command(serial, "remount read-only");
                self.bridge
                    .remount(serial, false)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }
        };

        match outcome {
            Ok(()) => {
                state.mark_restored();
                log::info!("{}: system partition back to read-only", serial);
            }
            Err(detail) => self.warn(
                run,
                WarningKind::RestoreFailed,
                DeployStep::Restore,
                format!("system partition left writable: {}", detail),
            ),
        }
    }

    /// `-> ArtifactPushed`. With `su`, files outside the staging directory
    /// are pushed there first and copied into place as root.
    fn push_artifact(&self, session: &DeviceSession, artifact: &DeploymentArtifact) -> DeployResult<()> {
        let serial = session.serial();
        let remote = artifact.remote_path();
        let local = artifact.local_path();
        let staged_prefix = format!("{}/", shell::STAGING_DIR);
        let direct = session.root() != Some(RootAccess::Su) || remote.starts_with(&staged_prefix);

        if direct {
            self.command(serial, &format!("push {} {}", local.display(), remote));
            self.bridge
                .push(serial, local, remote)
                .map_err(|e| e.at_step(DeployStep::Push))?;
        } else {
            let staged = shell::staging_path(artifact.remote_file_name());
            self.command(serial, &format!("push {} {}", local.display(), staged));
            self.bridge
                .push(serial, local, &staged)
                .map_err(|e| e.at_step(DeployStep::Push))?;
            let copy = self.root_shell(session, &shell::copy(&staged, remote), DeployStep::Push)?;
            let cleanup = self.shell(serial, &shell::remove(&staged), DeployStep::Push)?;
            if !cleanup.success() {
                log::debug!("leaving {} behind: {}", staged, cleanup.describe());
            }
            if !copy.success() {
                return Err(DeployError::PushFailed {
                    local: local.to_path_buf(),
                    remote: remote.to_string(),
                    detail: copy.describe(),
                });
            }
        }

        self.verify_digest(session, artifact)
    }

    /// Compare the device-side sha256 with the local one when `sha256sum`
    /// exists on the device
    fn verify_digest(&self, session: &DeviceSession, artifact: &DeploymentArtifact) -> DeployResult<()> {
        let remote = artifact.remote_path();
        let result = self.root_shell(session, &shell::sha256sum(remote), DeployStep::Push)?;
        if !result.success() {
            log::debug!("{}: skipping digest check ({})", session.serial(), result.describe());
            return Ok(());
        }
        match ContentHash::from_sha256sum_output(result.stdout()) {
            Some(device) if device == *artifact.digest() => Ok(()),
            Some(device) => Err(DeployError::PushFailed {
                local: artifact.local_path().to_path_buf(),
                remote: remote.to_string(),
                detail: format!(
                    "digest mismatch: device {} local {}",
                    device.short(),
                    artifact.digest().short()
                ),
            }),
            None => {
                log::debug!("unparseable sha256sum output: {}", result.stdout().trim());
                Ok(())
            }
        }
    }

    /// `-> PermissionsSet`
    fn set_permissions(&self, session: &DeviceSession, artifact: &DeploymentArtifact) -> DeployResult<()> {
        let remote = artifact.remote_path();
        let chmod = self.root_shell(
            session,
            &shell::chmod(&artifact.mode_octal(), remote),
            DeployStep::Permission,
        )?;
        if !chmod.success() {
            return Err(DeployError::PermissionDenied {
                remote: remote.to_string(),
                detail: format!("chmod {}: {}", artifact.mode_octal(), chmod.describe()),
            });
        }
        if let Some(owner) = artifact.owner() {
            let chown = self.root_shell(session, &shell::chown(owner, remote), DeployStep::Permission)?;
            if !chown.success() {
                return Err(DeployError::PermissionDenied {
                    remote: remote.to_string(),
                    detail: format!("chown {}: {}", owner, chown.describe()),
                });
            }
        }
        Ok(())
    }

    /// Relax SELinux, start detached, then poll `pidof`
    fn launch(
        &self,
        session: &DeviceSession,
        artifact: &DeploymentArtifact,
        options: &FridaOptions,
        run: &mut Run,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        self.checkpoint(DeployStep::Launch)?;
        if options.selinux_permissive {
            let result = self.root_shell(session, shell::SELINUX_PERMISSIVE, DeployStep::Launch)?;
            if !result.success() {
                self.warn(
                    run,
                    WarningKind::Selinux,
                    DeployStep::Launch,
                    format!("setenforce 0 failed ({})", result.describe()),
                );
            }
        }

        let command = shell::launch_detached(artifact.remote_path());
        let launched = self.root_shell(session, &command, DeployStep::Launch)?;
        if !launched.success() && session.root() == Some(RootAccess::Su) {
            log::debug!("su launch failed ({}), retrying as shell user", launched.describe());
            self.shell(session.serial(), &command, DeployStep::Launch)?;
        }

        let name = options.process_name();
        for attempt in 1..=options.verify_attempts {
            if !options.verify_delay.is_zero() {
                thread::sleep(options.verify_delay);
            }
            self.checkpoint(DeployStep::Verify)?;
            if let Some(pids) = self.running_pids(session, name)? {
                log::info!("{}: {} running (pid {})", session.serial(), name, pids);
                report.running_pids = Some(pids);
                return Ok(());
            }
            log::debug!("{}: {} not running yet ({}/{})", session.serial(), name, attempt, options.verify_attempts);
        }

        self.warn(
            run,
            WarningKind::Unverified,
            DeployStep::Verify,
            format!("{} not running after {} checks", name, options.verify_attempts),
        );
        Ok(())
    }

    fn running_pids(&self, session: &DeviceSession, name: &str) -> DeployResult<Option<String>> {
        let result = self.root_shell(session, &shell::pidof(name), DeployStep::Verify)?;
        Ok(result
            .success()
            .then(|| result.first_line().map(str::to_string))
            .flatten())
    }

    fn checkpoint(&self, step: DeployStep) -> DeployResult<()> {
        if self.cancel.is_cancelled() {
            return Err(DeployError::Interrupted { step });
        }
        Ok(())
    }

    fn shell(&self, serial: &str, command: &str, step: DeployStep) -> DeployResult<CommandResult> {
        self.command(serial, command);
        self.bridge
            .shell(serial, command)
            .map_err(|e| e.at_step(step))
    }

    fn root_shell(&self, session: &DeviceSession, command: &str, step: DeployStep) -> DeployResult<CommandResult> {
        self.shell(session.serial(), &session.privileged(command), step)
    }

    fn command(&self, serial: &str, command: &str) {
        if self.events.wants_detailed_events() {
            self.events.on_event(DeployEvent::Command {
                serial: serial.to_string(),
                command: command.to_string(),
            });
        }
    }

    fn begin(&self, session: &DeviceSession, task: DeployTask) -> Run {
        self.events.on_event(DeployEvent::Started {
            serial: session.serial().to_string(),
            task,
        });
        let mut run = Run {
            serial: session.serial().to_string(),
            stages: vec![DeployStage::Idle],
            warnings: Vec::new(),
        };
        self.enter(&mut run, DeployStage::DeviceSelected);
        run
    }

    fn enter(&self, run: &mut Run, stage: DeployStage) {
        log::debug!("{}: {}", run.serial, stage);
        run.stages.push(stage);
        self.events.on_event(DeployEvent::StageReached {
            serial: run.serial.clone(),
            stage,
        });
    }

    fn warn(&self, run: &mut Run, kind: WarningKind, step: DeployStep, message: String) {
        log::warn!("{}: [{}] {}", run.serial, step, message);
        self.events.on_event(DeployEvent::Warning {
            serial: run.serial.clone(),
            step,
            message: message.clone(),
        });
        run.warnings.push(DeployWarning { kind, step, message });
    }

    fn fail(&self, run: &mut Run, err: DeployError) -> DeployError {
        self.enter(run, DeployStage::Failed);
        self.events.on_event(DeployEvent::Failed {
            serial: run.serial.clone(),
            step: err.step(),
            message: err.to_string(),
        });
        err
    }

    fn finish(&self, mut run: Run, mut report: DeployReport) -> DeployReport {
        self.enter(&mut run, DeployStage::Done);
        self.events.on_event(DeployEvent::Completed {
            serial: run.serial.clone(),
            remote_path: report.remote_path.clone(),
            restarted: report.restarted,
        });
        report.stages = run.stages;
        report.warnings = run.warnings;
        report
    }
}
