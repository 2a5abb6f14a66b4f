//! Market lifecycle orchestrator.
//!
//! One market's pass runs in a fixed order because each step reads the ledger
//! state produced by the one before it:
//!
//! 1. close expired positions
//! 2. synchronize risk, forced when anything was closed
//! 3. activate pending positions
//!
//! Newly activated positions are therefore counted in risk on the next pass,
//! not this one.

use std::sync::Arc;

use tracing::{info, warn};

use super::report::MarketReport;
use crate::application::batch::{BatchExecutor, TransitionOp};
use crate::application::risk::RiskSynchronizer;
use crate::domain::{BatchOutcome, Market, PositionId, Transition};
use crate::error::Result;
use crate::port::PositionLedger;

/// Drives one market through a keeper pass.
pub struct MarketLifecycle {
    ledger: Arc<dyn PositionLedger>,
    executor: BatchExecutor,
    synchronizer: RiskSynchronizer,
}

impl MarketLifecycle {
    /// Create a lifecycle orchestrator.
    pub fn new(
        ledger: Arc<dyn PositionLedger>,
        executor: BatchExecutor,
        synchronizer: RiskSynchronizer,
    ) -> Self {
        Self {
            ledger,
            executor,
            synchronizer,
        }
    }

    /// Risk synchronizer used by this orchestrator.
    #[must_use]
    pub fn synchronizer(&self) -> &RiskSynchronizer {
        &self.synchronizer
    }

    /// Run the close → sync → activate sequence for `market`.
    ///
    /// # Errors
    ///
    /// Fails before touching the ledger when the market's option token is not
    /// deployed, so expired positions are never closed without the cache
    /// following. Read errors, deployment errors and a failed risk write
    /// propagate; per-position transition failures are recorded in the report
    /// instead.
    pub async fn process_market(&self, market: &Market) -> Result<MarketReport> {
        market.option_token()?;
        let collection = market.collection();

        let expired = self.ledger.expired_positions(collection).await?;
        let closed = self
            .executor
            .execute(&expired, &TransitionOp::new(Transition::Close, collection))
            .await?;

        // Closing always changes the active set, so bypass the materiality test.
        let risk = self
            .synchronizer
            .sync(market, closed.submitted() > 0)
            .await?;

        let pending = self.ledger.pending_positions(collection).await?;
        let activated = self
            .executor
            .execute(&pending, &TransitionOp::new(Transition::Activate, collection))
            .await?;

        info!(
            market = %market.name(),
            closed = %closed,
            activated = %activated,
            risk_updated = risk.updated(),
            "Market processed"
        );

        Ok(MarketReport {
            market: market.name().clone(),
            closed,
            risk,
            activated,
        })
    }

    /// Force-close the given pending positions, refunding their premium.
    ///
    /// Administrative cleanup for positions that should never activate; not
    /// part of the regular pass.
    ///
    /// # Errors
    ///
    /// Propagates a deployment error from the batch attempt.
    pub async fn cancel_pending(
        &self,
        market: &Market,
        ids: &[PositionId],
    ) -> Result<BatchOutcome> {
        warn!(market = %market.name(), count = ids.len(), "Canceling pending positions");
        self.executor
            .execute(
                ids,
                &TransitionOp::new(Transition::ForceClosePending, market.collection()),
            )
            .await
    }
}
