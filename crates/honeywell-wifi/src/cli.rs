//! Clap derive structures for the `honeywell-wifi` binary.
//!
//! Only depends on clap + clap_complete so `build.rs` can include it for
//! man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// honeywell-wifi -- sample thermostat platform with a debug trigger server
#[derive(Debug, Parser)]
#[command(
    name = "honeywell-wifi",
    version,
    about = "Sample thermostat platform plugin for a smart-home bridge",
    long_about = "Runs the honeywell-wifi platform against a local host harness.\n\n\
        Cached accessories are restored at startup, and a small HTTP server on\n\
        port 18081 triggers /add, /reachability and /remove by hand.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the default location
    #[arg(long, env = "HONEYWELL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the platform and the debug trigger server until Ctrl-C
    Run,

    /// List accessories in the host cache
    #[command(alias = "ls")]
    Accessories,

    /// Send an identify request to a cached accessory
    Identify(IdentifyArgs),

    /// Write one thermostat characteristic on a cached accessory
    Set(SetArgs),

    /// Drive one round of the configuration handshake
    Setup(SetupArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Accessory requests ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IdentifyArgs {
    /// Accessory UUID (see `honeywell-wifi accessories`)
    pub uuid: String,

    /// Identify as an unpaired accessory
    #[arg(long)]
    pub unpaired: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Accessory UUID (see `honeywell-wifi accessories`)
    pub uuid: String,

    /// Characteristic, e.g. TargetTemperature or TargetHeatingCoolingState
    pub characteristic: String,

    /// New value: degrees Celsius, or a mode/unit name or numeric code
    pub value: String,
}

// ── Setup ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Accessory name to submit; omit to fetch the form
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the effective configuration
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
