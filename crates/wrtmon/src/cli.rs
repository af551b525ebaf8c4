//! Clap derive structures for the `wrtmon` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wrtmon -- poll OpenWrt routers over ubus
#[derive(Debug, Parser)]
#[command(
    name = "wrtmon",
    version,
    about = "Poll OpenWrt routers over ubus",
    long_about = "Collects board identity, wireless clients, mesh link quality and\n\
        multi-WAN health from OpenWrt routers through rpcd's JSON-RPC endpoint.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "WRTMON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List configured devices
    #[command(alias = "ls")]
    Devices,

    /// Run one update cycle and print the resulting snapshot
    #[command(alias = "snap")]
    Snapshot(SnapshotArgs),

    /// Poll continuously and print every published snapshot
    Watch,

    /// Start or cancel WPS push-button pairing on an access point
    Wps(WpsArgs),

    /// Reboot a device
    Reboot(RebootArgs),
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Device id (all devices when omitted)
    pub device: Option<String>,
}

#[derive(Debug, Args)]
pub struct WpsArgs {
    /// Device id
    pub device: String,

    /// Access-point interface, e.g. phy0-ap0
    pub iface: String,

    pub state: Toggle,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct RebootArgs {
    /// Device id
    pub device: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn wps_parses_toggle() {
        let cli = Cli::try_parse_from(["wrtmon", "wps", "ap1", "phy0-ap0", "on"]).expect("parses");
        let Command::Wps(args) = cli.command else {
            panic!("expected wps command");
        };
        assert_eq!(args.device, "ap1");
        assert_eq!(args.iface, "phy0-ap0");
        assert!(matches!(args.state, Toggle::On));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["wrtmon", "snapshot", "gw", "-o", "json-compact", "-vv"])
            .expect("parses");
        assert!(matches!(cli.global.output, OutputFormat::JsonCompact));
        assert_eq!(cli.global.verbose, 2);
    }
}
