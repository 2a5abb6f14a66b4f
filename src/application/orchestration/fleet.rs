//! Fleet orchestrator.
//!
//! Markets are processed one after another. Every write comes from a single
//! submitting key whose nonces must stay ordered, so there is no fan-out.

use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};

use super::lifecycle::MarketLifecycle;
use super::report::{CycleReport, MarketFailure};
use crate::domain::ContractCall;
use crate::error::{KeeperError, Result};
use crate::port::{MarketRegistry, TransactionSubmitter};

/// Runs a keeper pass over every configured market.
pub struct Fleet {
    registry: Arc<dyn MarketRegistry>,
    lifecycle: MarketLifecycle,
    submitter: Arc<dyn TransactionSubmitter>,
}

impl Fleet {
    /// Create a fleet orchestrator.
    pub fn new(
        registry: Arc<dyn MarketRegistry>,
        lifecycle: MarketLifecycle,
        submitter: Arc<dyn TransactionSubmitter>,
    ) -> Self {
        Self {
            registry,
            lifecycle,
            submitter,
        }
    }

    /// Per-market orchestrator.
    #[must_use]
    pub fn lifecycle(&self) -> &MarketLifecycle {
        &self.lifecycle
    }

    /// Process all markets, then refresh protocol-wide PNL at most once.
    ///
    /// A market's failure is recorded and the pass moves on, unless the error
    /// is a deployment problem shared by every market.
    ///
    /// # Errors
    ///
    /// Returns an error when the registry cannot be read, a global
    /// collaborator is missing, or the protocol-wide refresh fails. A missing
    /// collaborator is caught before any market is touched.
    pub async fn process_all_markets(&self) -> Result<CycleReport> {
        self.registry.addresses().await?.ensure_deployed()?;
        let markets = self.registry.markets().await?;
        let mut report = CycleReport::start();

        for market in &markets {
            let span = info_span!("market", name = %market.name());
            match self.lifecycle.process_market(market).instrument(span).await {
                Ok(market_report) => report.markets.push(market_report),
                Err(e) if e.is_fatal_for_cycle() => {
                    error!(market = %market.name(), error = %e, "Aborting cycle");
                    return Err(e);
                }
                Err(e) => {
                    error!(market = %market.name(), error = %e, "Market pass failed");
                    report.failures.push(MarketFailure {
                        market: market.name().clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.needs_global_pnl_update() {
            let receipt = self
                .submitter
                .submit(&ContractCall::UpdateUnrealizedPnl)
                .await
                .map_err(|e| {
                    if e.is_fatal_for_cycle() {
                        e
                    } else {
                        KeeperError::GlobalRefreshFailed(e.to_string()).into()
                    }
                })?;
            info!(gas_used = receipt.gas_used, "Unrealized PNL refreshed");
            report.global_refresh = Some(receipt);
        }

        report.finish();
        info!(
            markets = report.markets.len(),
            failed_markets = report.failures.len(),
            closed = report.positions_closed(),
            activated = report.positions_activated(),
            stuck = report.failed_positions(),
            gas_used = report.gas_used(),
            "Cycle complete"
        );

        Ok(report)
    }
}
