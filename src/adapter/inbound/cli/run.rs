//! Handler for the `run` command.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, info_span, Instrument};

use super::command::RunArgs;
use super::dispatch::load_config;
use super::{output, report};
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Run cycles on a fixed interval until Ctrl-C or the cycle limit.
///
/// A cycle in flight always runs to completion; the interrupt is only
/// honoured between cycles so no market is left half processed.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let runtime = bootstrap::build(&config, args.dry_run)?;
    // A gap here would fail every tick, so refuse to start the loop.
    runtime.deployment.addresses.ensure_deployed()?;

    let interval = args
        .interval
        .map_or_else(|| config.schedule.interval(), Duration::from_secs);

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Network", &config.network.name);
    output::field("Markets", runtime.deployment.markets.len());
    output::field("Interval", format!("{}s", interval.as_secs()));
    if runtime.dry_run {
        output::warning("Dry run: no transactions will be sent");
    }

    let (stop_tx, mut stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, finishing current cycle");
            let _ = stop_tx.send(true);
        }
    });

    let mut n: u64 = 0;
    loop {
        n += 1;
        match runtime
            .keeper
            .process_all_markets()
            .instrument(info_span!("cycle", n))
            .await
        {
            Ok(cycle) => report::print_cycle(&cycle),
            Err(e) => {
                error!(cycle = n, error = %e, "Cycle aborted");
                output::error(&format!("cycle {n} aborted: {e}"));
            }
        }

        if args.cycles.is_some_and(|limit| n >= limit) || *stop_rx.borrow() {
            break;
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            Ok(()) = stop_rx.changed() => break,
        }
    }

    info!(cycles = n, "Keeper stopped");
    output::success(&format!("Stopped after {n} cycles"));
    Ok(())
}
