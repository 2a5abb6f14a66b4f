//! Read side of the position ledger.

use alloy_primitives::{Address, I256, U256};
use async_trait::async_trait;

use crate::domain::PositionId;
use crate::error::Result;

/// Batched state queries against the position ledger.
///
/// Read errors propagate and are fatal for the current market's cycle.
#[async_trait]
pub trait PositionLedger: Send + Sync {
    /// Positions awaiting activation (`getPendingOptions`).
    async fn pending_positions(&self, collection: Address) -> Result<Vec<PositionId>>;

    /// Positions currently counted in risk (`getActiveOptions`).
    async fn active_positions(&self, collection: Address) -> Result<Vec<PositionId>>;

    /// Active positions at or past expiry (`getExpiredOptions`).
    async fn expired_positions(&self, collection: Address) -> Result<Vec<PositionId>>;

    /// Aggregate `(pnl, weighted_delta)` over the given active positions
    /// (`sumPNLWeightedDelta`).
    async fn sum_pnl_weighted_delta(
        &self,
        collection: Address,
        ids: &[PositionId],
    ) -> Result<(I256, I256)>;

    /// Outstanding supply of a market's option token, its total notional.
    async fn option_supply(&self, option_token: Address) -> Result<U256>;
}
