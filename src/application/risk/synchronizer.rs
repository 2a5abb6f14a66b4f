//! Risk synchronizer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{ContractCall, Market, Materiality, RiskSnapshot, TxReceipt};
use crate::error::{KeeperError, Result};
use crate::port::{PositionLedger, RiskCache, TransactionSubmitter};

/// Result of one synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Value read from the cache before the sync.
    pub cached: RiskSnapshot,
    /// Value recomputed from the active set.
    pub computed: RiskSnapshot,
    /// Whether the write was forced past the materiality test.
    pub forced: bool,
    /// Receipt of the cache write, if one was made.
    pub receipt: Option<TxReceipt>,
}

impl SyncOutcome {
    /// True when the cache was written.
    #[must_use]
    pub const fn updated(&self) -> bool {
        self.receipt.is_some()
    }
}

/// Recomputes a market's aggregate risk and writes it when it matters.
pub struct RiskSynchronizer {
    ledger: Arc<dyn PositionLedger>,
    cache: Arc<dyn RiskCache>,
    submitter: Arc<dyn TransactionSubmitter>,
    materiality: Materiality,
}

impl RiskSynchronizer {
    /// Create a synchronizer using `materiality` to gate writes.
    pub fn new(
        ledger: Arc<dyn PositionLedger>,
        cache: Arc<dyn RiskCache>,
        submitter: Arc<dyn TransactionSubmitter>,
        materiality: Materiality,
    ) -> Self {
        Self {
            ledger,
            cache,
            submitter,
            materiality,
        }
    }

    /// Materiality rule in effect.
    #[must_use]
    pub const fn materiality(&self) -> Materiality {
        self.materiality
    }

    /// Synchronize one market's cached risk.
    ///
    /// Reads the cache, recomputes from the active set and writes only when
    /// the change is material or `forced` is set.
    ///
    /// # Errors
    ///
    /// Fails fast with `CollaboratorNotDeployed` when the option token or risk
    /// cache is missing. Read errors and a failed cache write propagate.
    pub async fn sync(&self, market: &Market, forced: bool) -> Result<SyncOutcome> {
        market.option_token()?;
        let collection = market.collection();

        let cached = self.cache.asset_risk(collection).await?;
        let computed = self.compute(market).await?;

        if !forced && !self.materiality.is_material(&cached, &computed) {
            debug!(
                market = %market.name(),
                cached = %cached,
                computed = %computed,
                "Risk change below materiality, skipping write"
            );
            return Ok(SyncOutcome {
                cached,
                computed,
                forced,
                receipt: None,
            });
        }

        let receipt = self
            .submitter
            .submit(&ContractCall::UpdateCollectionRisk {
                collection,
                snapshot: computed,
            })
            .await?;

        info!(
            market = %market.name(),
            cached = %cached,
            computed = %computed,
            forced,
            gas_used = receipt.gas_used,
            "Risk cache updated"
        );

        Ok(SyncOutcome {
            cached,
            computed,
            forced,
            receipt: Some(receipt),
        })
    }

    /// Recompute `{PNL, delta}` from the market's currently active positions.
    ///
    /// # Errors
    ///
    /// Returns `ZeroNotional` when positions are active but the option token
    /// reports no supply, and propagates read errors.
    pub async fn compute(&self, market: &Market) -> Result<RiskSnapshot> {
        let option_token = market.option_token()?;
        let collection = market.collection();

        let active = self.ledger.active_positions(collection).await?;
        if active.is_empty() {
            return Ok(RiskSnapshot::ZERO);
        }

        let (pnl, weighted_delta) = self
            .ledger
            .sum_pnl_weighted_delta(collection, &active)
            .await?;
        let supply = self.ledger.option_supply(option_token).await?;
        if supply.is_zero() {
            return Err(KeeperError::ZeroNotional {
                market: market.name().clone(),
            }
            .into());
        }

        Ok(RiskSnapshot::from_aggregate(pnl, weighted_delta, supply)?)
    }

    /// Unconditionally write a zero snapshot. Administrative recovery only.
    ///
    /// # Errors
    ///
    /// Propagates the write failure.
    pub async fn reset(&self, market: &Market) -> Result<TxReceipt> {
        warn!(market = %market.name(), "Resetting cached risk to zero");
        let receipt = self
            .submitter
            .submit(&ContractCall::UpdateCollectionRisk {
                collection: market.collection(),
                snapshot: RiskSnapshot::ZERO,
            })
            .await?;
        info!(market = %market.name(), gas_used = receipt.gas_used, "Risk cache reset");
        Ok(receipt)
    }
}
