//! CLI Argument Parsing
//!
//! Global flags (--json, --color, --verbose, --config, --serial) are
//! inherited by all subcommands. Running without a subcommand opens the
//! interactive menu.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::{Architecture, FridaVersion};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// droidprep - prepare Android devices for traffic interception
#[derive(Parser, Debug)]
#[command(name = "droidprep")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'droidprep' without arguments for the interactive menu.")]
pub struct Cli {
    /// Output NDJSON events for automation
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./droidprep.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Device serial (required when several devices are attached)
    #[arg(short, long, global = true)]
    pub serial: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List attached devices and their state
    Devices,

    /// Print the trust store filename for a certificate (no device needed)
    Hash {
        /// Certificate file (DER or PEM)
        cert: PathBuf,
    },

    /// Install a CA certificate into the system trust store
    Cert {
        /// Certificate file (DER or PEM); defaults to [certificate] path
        #[arg(long, short = 'c')]
        cert_file: Option<PathBuf>,

        /// Trust store directory on the device
        #[arg(long)]
        store_dir: Option<String>,

        /// Reboot the device after installing
        #[arg(long)]
        reboot: bool,
    },

    /// Deploy and start frida-server
    Frida {
        /// Release to download (x.y.z)
        #[arg(long)]
        frida_version: Option<FridaVersion>,

        /// Force an architecture instead of detecting it
        #[arg(long, value_enum)]
        arch: Option<Architecture>,

        /// Architecture to use when the device ABI is not recognised
        #[arg(long, value_enum)]
        fallback_arch: Option<Architecture>,

        /// Push this local binary instead of a downloaded release
        #[arg(long, conflicts_with = "frida_version")]
        binary: Option<PathBuf>,

        /// Destination path on the device
        #[arg(long)]
        remote_path: Option<String>,

        /// Push and chmod only; do not start the server
        #[arg(long)]
        no_start: bool,

        /// Deploy to every attached device, one after another (not with --serial)
        #[arg(long)]
        all: bool,

        /// Fail (exit 19) when the server cannot be confirmed running
        #[arg(long)]
        strict: bool,
    },

    /// Check host tools (adb, openssl) and show install commands
    Tools {
        /// Run the install commands for missing tools
        #[arg(long)]
        install: bool,

        /// Do not ask before installing
        #[arg(short, long, requires = "install")]
        yes: bool,
    },
}
