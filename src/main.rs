//! droidprep CLI - prepare Android devices for traffic interception
//!
//! Usage: droidprep [COMMAND]
//!
//! Commands:
//!   devices  List attached devices
//!   hash     Print the trust store filename for a certificate
//!   cert     Install a CA certificate into the system trust store
//!   frida    Deploy and start frida-server
//!   tools    Check host tools and show install commands

mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use droidprep::presentation::{Cli, Commands};
use droidprep::CancelToken;

use commands::frida::FridaArgs;
use commands::CommandContext;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cancel = CancelToken::new();
    install_interrupt_handler(cancel.clone());

    if let Err(err) = run(&cli, cancel) {
        ui::error::print_error(&err, cli.json);
        std::process::exit(ui::error::exit_code(&err));
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// First Ctrl+C asks the engine to stop after restoring the device;
/// a second one exits immediately.
fn install_interrupt_handler(cancel: CancelToken) {
    let result = ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        eprintln!("\nInterrupted; cleaning up (press Ctrl+C again to abort)");
        cancel.cancel();
    });
    if let Err(err) = result {
        log::warn!("could not install Ctrl+C handler: {}", err);
    }
}

fn run(cli: &Cli, cancel: CancelToken) -> Result<()> {
    let ctx = CommandContext::load(cli, cancel)?;

    match &cli.command {
        None => commands::interactive::cmd_interactive(&ctx),
        Some(Commands::Devices) => commands::devices::cmd_devices(&ctx),
        Some(Commands::Hash { cert }) => commands::hash::cmd_hash(&ctx, cert),
        Some(Commands::Cert {
            cert_file,
            store_dir,
            reboot,
        }) => commands::cert::cmd_cert(&ctx, cert_file.clone(), store_dir.clone(), *reboot),
        Some(Commands::Frida {
            frida_version,
            arch,
            fallback_arch,
            binary,
            remote_path,
            no_start,
            all,
            strict,
        }) => commands::frida::cmd_frida(
            &ctx,
            FridaArgs {
                frida_version: *frida_version,
                arch: *arch,
                fallback_arch: *fallback_arch,
                binary: binary.clone(),
                remote_path: remote_path.clone(),
                no_start: *no_start,
                all: *all,
                strict: *strict,
            },
        ),
        Some(Commands::Tools { install, yes }) => commands::tools::cmd_tools(&ctx, *install, *yes),
    }
}
