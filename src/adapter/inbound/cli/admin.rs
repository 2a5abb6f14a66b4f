//! Handlers for the administrative `cancel` and `reset-risk` commands.

use tracing::warn;

use super::command::{CancelArgs, ResetRiskArgs};
use super::dispatch::load_config;
use super::{output, report};
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Force-close pending positions of one market.
pub async fn cancel(args: &CancelArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let runtime = bootstrap::build(&config, args.dry_run)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Cancel pending positions");
    let outcome = runtime
        .keeper
        .cancel_pending(&args.market, &args.ids)
        .await?;
    report::print_outcome("cancel", &args.market, &outcome);
    Ok(())
}

/// Zero one market's cached risk.
pub async fn reset_risk(args: &ResetRiskArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let runtime = bootstrap::build(&config, args.dry_run)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Reset cached risk");
    warn!(market = %args.market, "Operator requested risk reset");
    let receipt = runtime.keeper.reset_risk(&args.market).await?;
    report::print_receipt("reset-risk", &args.market, &receipt);
    Ok(())
}
