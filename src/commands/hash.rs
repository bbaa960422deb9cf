use std::path::Path;

use anyhow::Result;
use droidprep::domain::services::CertIdentifier;
use droidprep::presentation::factory;

use super::CommandContext;
use crate::ui::views::devices::render_store_filename;

/// Print `<hash>.0` for a certificate without touching any device
pub fn cmd_hash(ctx: &CommandContext, cert: &Path) -> Result<()> {
    let toolkit = factory::create_toolkit(&ctx.config)?;
    let prepared = CertIdentifier::new(&toolkit).prepare(cert)?;
    let source = cert.display().to_string();

    ctx.output(
        || render_store_filename(&source, &prepared.name().file_name(), ctx.ui.color),
        || {
            serde_json::json!({
                "event": "hash",
                "certificate": source,
                "encoding": prepared.source_encoding().as_str(),
                "subject_hash": prepared.name().subject_hash(),
                "store_filename": prepared.name().file_name(),
                "sha256": prepared.digest().hex(),
            })
        },
    )
}
