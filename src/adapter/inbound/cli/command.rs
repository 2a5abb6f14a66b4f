//! Command-line interface definitions.
//!
//! Defines the CLI structure for the keeper using `clap`. Every command reads
//! the same TOML config; write commands accept `--dry-run` to log the calls
//! they would send instead of sending them.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::PositionId;

const DEFAULT_CONFIG: &str = "config.toml";

/// Keeper controller for NFT option markets
#[derive(Parser, Debug)]
#[command(name = "surge-keeper")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one keeper pass over every market
    Cycle(CycleArgs),

    /// Run keeper passes on a fixed interval until interrupted
    Run(RunArgs),

    /// Show per-market position counts and cached risk
    Status(ConfigPathArg),

    /// Force-close pending positions of a market, refunding premium
    Cancel(CancelArgs),

    /// Zero a market's cached risk
    ResetRisk(ResetRiskArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `surge-keeper check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration and address resolution without RPC calls.
    Config(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for the `cycle` subcommand.
#[derive(Parser, Debug)]
pub struct CycleArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Process only this market; skips the protocol-wide PNL refresh.
    #[arg(long)]
    pub market: Option<String>,

    /// Log transactions instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Seconds between cycles; overrides `[schedule] interval_secs`.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many cycles.
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Log transactions instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `cancel` subcommand.
#[derive(Parser, Debug)]
pub struct CancelArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Market whose positions to cancel.
    #[arg(long)]
    pub market: String,

    /// Comma-separated position ids.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<PositionId>,

    /// Log transactions instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `reset-risk` subcommand.
#[derive(Parser, Debug)]
pub struct ResetRiskArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Market whose cached risk to zero.
    #[arg(long)]
    pub market: String,

    /// Log transactions instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_parses_comma_separated_ids() {
        let cli = Cli::try_parse_from([
            "surge-keeper",
            "cancel",
            "--market",
            "BAYC",
            "--ids",
            "1,#2, 3",
        ])
        .unwrap();
        match cli.command {
            Commands::Cancel(args) => {
                assert_eq!(args.market, "BAYC");
                assert_eq!(
                    args.ids,
                    vec![PositionId::from(1), PositionId::from(2), PositionId::from(3)]
                );
                assert_eq!(args.config, PathBuf::from("config.toml"));
            }
            other => panic!("expected cancel, got {other:?}"),
        }
    }

    #[test]
    fn cancel_requires_ids() {
        assert!(Cli::try_parse_from(["surge-keeper", "cancel", "--market", "BAYC"]).is_err());
    }

    #[test]
    fn run_accepts_interval_override() {
        let cli = Cli::try_parse_from(["surge-keeper", "run", "--interval", "60", "--dry-run"])
            .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.interval, Some(60));
                assert!(args.dry_run);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["surge-keeper", "status", "--json", "-c", "k.toml"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Status(ref a) if a.config == PathBuf::from("k.toml")));
    }
}
