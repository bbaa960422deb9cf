use std::path::PathBuf;

use anyhow::Result;
use droidprep::domain::services::CertIdentifier;
use droidprep::presentation::factory;
use droidprep::DeployError;

use super::CommandContext;
use crate::ui::views::deploy::{render_cert_header, render_cert_summary, report_json};

pub fn cmd_cert(
    ctx: &CommandContext,
    cert_file: Option<PathBuf>,
    store_dir: Option<String>,
    reboot: bool,
) -> Result<()> {
    let cert_path = cert_file
        .or_else(|| ctx.config.certificate.path.clone())
        .ok_or_else(|| DeployError::Config {
            message: "no certificate given; pass --cert-file or set [certificate] path".to_string(),
        })?;

    let mut options = ctx.config.cert_options();
    if let Some(dir) = store_dir {
        options = options.with_store_dir(dir);
    }
    if reboot {
        options = options.with_reboot(true);
    }

    // Host-side preparation first; a bad certificate never touches the device.
    let toolkit = factory::create_toolkit(&ctx.config)?;
    let prepared = CertIdentifier::new(&toolkit).prepare(&cert_path)?;

    let engine = factory::create_engine(&ctx.config, ctx.event_sink("cert"), ctx.cancel.clone())?;
    let mut session = engine.select_device(ctx.serial.as_deref())?;

    if !ctx.ui.json {
        print!(
            "{}",
            render_cert_header(
                &cert_path.display().to_string(),
                &prepared.name().file_name(),
                ctx.ui.color,
                ctx.ui.unicode
            )
        );
    }

    let report = engine.install_certificate(&mut session, &prepared, &options)?;

    ctx.output(
        || render_cert_summary(&report, ctx.ui.color, ctx.ui.unicode),
        || report_json("cert", &report),
    )
}
