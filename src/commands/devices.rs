use anyhow::Result;
use droidprep::domain::ports::Bridge;
use droidprep::presentation::factory;

use super::CommandContext;
use crate::ui::views::devices::{devices_json, render_devices};

pub fn cmd_devices(ctx: &CommandContext) -> Result<()> {
    let bridge = factory::create_bridge(&ctx.config)?;
    let devices = bridge.list_devices()?;

    ctx.output(
        || render_devices(&devices, ctx.ui.color, ctx.ui.unicode),
        || devices_json(&devices),
    )
}
