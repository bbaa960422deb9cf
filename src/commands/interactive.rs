//! Interactive menu shown when droidprep runs without a subcommand

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::{Input, Select};
use droidprep::domain::ports::Bridge;
use droidprep::presentation::factory;

use super::frida::FridaArgs;
use super::{cert, devices, frida, tools, CommandContext};

pub fn cmd_interactive(ctx: &CommandContext) -> Result<()> {
    if !ctx.ui.interactive() {
        if ctx.ui.json {
            crate::ui::json::emit(serde_json::json!({
                "event": "interactive",
                "status": "unavailable",
                "hint": "pass a subcommand, e.g. 'droidprep devices'",
            }))?;
        } else {
            println!("No terminal attached. Run 'droidprep --help' to see the commands.");
        }
        return Ok(());
    }

    let items = [
        "[1] List devices",
        "[2] Install a CA certificate",
        "[3] Deploy frida-server",
        "[4] Check host tools",
        "[5] Quit",
    ];

    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(&items)
        .default(0)
        .interact()?;

    match selection {
        0 => devices::cmd_devices(ctx),
        1 => {
            let serial = match pick_target(ctx, false)? {
                Target::Device(serial) => Some(serial),
                _ => ctx.serial.clone(),
            };
            let ctx = ctx.with_serial(serial);
            let cert_file = prompt_cert_path(&ctx)?;
            cert::cmd_cert(&ctx, Some(cert_file), None, false)
        }
        2 => match pick_target(ctx, true)? {
            Target::Device(serial) => frida::cmd_frida(&ctx.with_serial(Some(serial)), FridaArgs::default()),
            Target::AllDevices => frida::cmd_frida(
                ctx,
                FridaArgs {
                    all: true,
                    ..FridaArgs::default()
                },
            ),
            Target::Default => frida::cmd_frida(ctx, FridaArgs::default()),
        },
        3 => tools::cmd_tools(ctx, false, false),
        _ => Ok(()),
    }
}

/// Device choice for a menu action
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// `--serial`, or the single attached device, or none (reported by the command)
    Default,
    Device(String),
    AllDevices,
}

impl Target {
    fn label(&self) -> String {
        match self {
            Target::Default => "Default device".to_string(),
            Target::Device(serial) => serial.clone(),
            Target::AllDevices => "All devices".to_string(),
        }
    }
}

/// Menu entries when the choice is ambiguous; empty means no question is needed
fn target_choices(serials: Vec<String>, allow_all: bool) -> Vec<Target> {
    if serials.len() < 2 {
        return Vec::new();
    }
    let mut choices: Vec<Target> = serials.into_iter().map(Target::Device).collect();
    if allow_all {
        choices.push(Target::AllDevices);
    }
    choices
}

fn pick_target(ctx: &CommandContext, allow_all: bool) -> Result<Target> {
    if ctx.serial.is_some() {
        return Ok(Target::Default);
    }
    let serials: Vec<String> = factory::create_bridge(&ctx.config)?
        .list_devices()?
        .into_iter()
        .filter(|d| d.is_usable())
        .map(|d| d.serial)
        .collect();

    let mut choices = target_choices(serials, allow_all);
    if choices.is_empty() {
        return Ok(Target::Default);
    }
    let labels: Vec<String> = choices.iter().map(Target::label).collect();
    let selection = Select::new()
        .with_prompt("Several devices are attached. Which one?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices.swap_remove(selection))
}

fn prompt_cert_path(ctx: &CommandContext) -> Result<PathBuf> {
    let mut input = Input::<String>::new().with_prompt("Certificate file (DER or PEM)");
    if let Some(path) = &ctx.config.certificate.path {
        input = input.default(path.display().to_string());
    }
    let answer = input.interact_text()?;
    Ok(PathBuf::from(answer.trim()))
}
