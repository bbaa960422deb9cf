use std::path::PathBuf;

use anyhow::Result;
use droidprep::infrastructure::host;
use droidprep::presentation::factory;
use droidprep::{Architecture, DeployError, FridaVersion};

use super::CommandContext;
use crate::ui::views::deploy::{
    frida_ps_json, render_frida_header, render_frida_ps, render_frida_summary, report_json,
};

/// Flags of `droidprep frida`
#[derive(Debug, Clone, Default)]
pub struct FridaArgs {
    pub frida_version: Option<FridaVersion>,
    pub arch: Option<Architecture>,
    pub fallback_arch: Option<Architecture>,
    pub binary: Option<PathBuf>,
    pub remote_path: Option<String>,
    pub no_start: bool,
    pub all: bool,
    pub strict: bool,
}

pub fn cmd_frida(ctx: &CommandContext, args: FridaArgs) -> Result<()> {
    check_selection(args.all, ctx.serial.as_deref())?;

    let mut options = ctx.config.frida_options().with_arch_override(args.arch);
    if args.fallback_arch.is_some() {
        options = options.with_fallback_arch(args.fallback_arch);
    }
    if let Some(path) = args.remote_path {
        options = options.with_remote_path(path);
    }
    if args.no_start {
        options = options.with_start(false);
    }
    let frida_ps = if args.no_start { None } else { host::locate_frida_ps() };

    let source = factory::create_artifact_source(&ctx.config, args.frida_version, args.binary);
    let engine = factory::create_engine(&ctx.config, ctx.event_sink("frida"), ctx.cancel.clone())?;

    let sessions = if args.all {
        engine.select_all()?
    } else {
        vec![engine.select_device(ctx.serial.as_deref())?]
    };

    if !ctx.ui.json {
        print!(
            "{}",
            render_frida_header(
                &source.describe(),
                sessions.len(),
                args.arch,
                ctx.ui.color,
                ctx.ui.unicode
            )
        );
    }

    // Devices are processed one after another; with --all a failure on one
    // device does not stop the rest, but the first error decides the exit code.
    let mut first_error: Option<DeployError> = None;
    for mut session in sessions {
        let failure = match engine.deploy_binary(&mut session, source.as_ref(), &options) {
            Ok(report) => {
                ctx.output(
                    || render_frida_summary(&report, ctx.ui.color, ctx.ui.unicode),
                    || report_json("frida", &report),
                )?;
                if let (Some(program), Some(_)) = (&frida_ps, &report.running_pids) {
                    let runner = factory::create_runner(&ctx.config);
                    let reachable =
                        host::frida_ps_reachable(&runner, &program.to_string_lossy(), &report.serial);
                    ctx.output(
                        || render_frida_ps(&report.serial, reachable, ctx.ui.color, ctx.ui.unicode),
                        || frida_ps_json(&report.serial, reachable),
                    )?;
                }
                report.strict_failure().filter(|_| args.strict)
            }
            Err(err) => Some(err),
        };

        if let Some(err) = failure {
            let interrupted = matches!(err, DeployError::Interrupted { .. });
            if !args.all || interrupted {
                return Err(err.into());
            }
            log::warn!("{}: {}", session.serial(), err);
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// `--all` and `--serial` name different device sets
fn check_selection(all: bool, serial: Option<&str>) -> Result<(), DeployError> {
    match (all, serial) {
        (true, Some(serial)) => Err(DeployError::Config {
            message: format!(
                "--all deploys to every attached device and cannot be combined with --serial {}",
                serial
            ),
        }),
        _ => Ok(()),
    }
}
