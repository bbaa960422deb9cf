use anyhow::{bail, Result};
use dialoguer::Confirm;
use droidprep::infrastructure::host::{
    self, available_managers, check_tools, manual_install_hint, HostOs, HostTool, PackageManager,
};

use super::CommandContext;
use crate::ui::views::tools::{render_tools, tools_json};

pub fn cmd_tools(ctx: &CommandContext, install: bool, yes: bool) -> Result<()> {
    let os = HostOs::current();
    let statuses = check_tools(&ctx.config.tools.adb, &ctx.config.tools.openssl);
    let missing: Vec<HostTool> = statuses
        .iter()
        .filter(|s| !s.is_installed())
        .map(|s| s.tool)
        .collect();

    let manager: Option<PackageManager> = if missing.is_empty() {
        None
    } else {
        available_managers(os).into_iter().next()
    };
    let commands = manager
        .map(|m| m.install_commands(&missing))
        .unwrap_or_default();
    let plan = manager.map(|m| (m, commands.as_slice()));

    ctx.output(
        || {
            render_tools(
                os,
                &statuses,
                plan,
                manual_install_hint(os),
                ctx.ui.color,
                ctx.ui.unicode,
            )
        },
        || tools_json(os, &statuses, plan),
    )?;

    if !install || missing.is_empty() {
        return Ok(());
    }

    let Some(manager) = manager else {
        bail!("no supported package manager found. {}", manual_install_hint(os));
    };

    if !yes {
        if !ctx.ui.interactive() {
            bail!("refusing to install without confirmation; pass --yes");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Install {} with {}?", join_tools(&missing), manager))
            .default(true)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    for command in &commands {
        let status = host::run_install_command(command)?;
        if !status.success() {
            bail!("'{}' failed ({})", command.join(" "), status);
        }
    }

    let still_missing: Vec<HostTool> = check_tools(&ctx.config.tools.adb, &ctx.config.tools.openssl)
        .into_iter()
        .filter(|s| !s.is_installed())
        .map(|s| s.tool)
        .collect();
    if !still_missing.is_empty() {
        bail!(
            "{} still not on PATH; open a new shell or set [tools] paths in droidprep.toml",
            join_tools(&still_missing)
        );
    }
    Ok(())
}

fn join_tools(tools: &[HostTool]) -> String {
    tools
        .iter()
        .map(HostTool::as_str)
        .collect::<Vec<_>>()
        .join(" and ")
}
