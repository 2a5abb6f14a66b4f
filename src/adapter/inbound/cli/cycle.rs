//! Handler for the `cycle` command.

use tracing::{info_span, Instrument};

use super::command::CycleArgs;
use super::dispatch::load_config;
use super::{output, report};
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Execute one keeper pass.
pub async fn execute(args: &CycleArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let runtime = bootstrap::build(&config, args.dry_run)?;
    output::header(env!("CARGO_PKG_VERSION"));
    if runtime.dry_run {
        output::warning("Dry run: no transactions will be sent");
    }

    if let Some(market) = &args.market {
        let market_report = runtime.keeper.process_market(market).await?;
        report::print_market(&market_report);
        return Ok(());
    }

    let cycle = runtime
        .keeper
        .process_all_markets()
        .instrument(info_span!("cycle", n = 1u64))
        .await?;
    report::print_cycle(&cycle);
    Ok(())
}
