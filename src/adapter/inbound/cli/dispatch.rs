//! Entry point from parsed arguments to command handlers.

use std::path::Path;

use super::command::{CheckCommand, Cli, ColorChoice, Commands};
use super::{admin, check, cycle, output, run, status};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Apply global flags and run the selected command.
///
/// # Errors
///
/// Propagates the command's error so the binary can exit non-zero.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match cli.command {
        Commands::Cycle(args) => cycle::execute(&args).await,
        Commands::Run(args) => run::execute(&args).await,
        Commands::Status(args) => status::execute(&args.config).await,
        Commands::Cancel(args) => admin::cancel(&args).await,
        Commands::ResetRisk(args) => admin::reset_risk(&args).await,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
    }
}

/// Load the config and start logging.
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config.init_logging();
    Ok(config)
}
