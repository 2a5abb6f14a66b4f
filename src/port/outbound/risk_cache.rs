//! Read side of the risk cache.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::domain::RiskSnapshot;
use crate::error::Result;

/// Cached per-market aggregate risk (`getAssetRisk`).
///
/// Writes go through the [`TransactionSubmitter`](super::submitter::TransactionSubmitter).
#[async_trait]
pub trait RiskCache: Send + Sync {
    /// Currently cached `{PNL, delta}` for a collection.
    ///
    /// # Errors
    ///
    /// Fails with `CollaboratorNotDeployed` if the cache is not deployed.
    async fn asset_risk(&self, collection: Address) -> Result<RiskSnapshot>;
}
