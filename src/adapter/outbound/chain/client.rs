//! Read side of the on-chain collaborators.

use alloy_primitives::{Address, I256, U256};
use alloy_provider::DynProvider;
use async_trait::async_trait;

use super::bindings::{AssetRiskCache, KeeperHelper, OptionToken};
use crate::domain::{Collaborator, ContractAddresses, PositionId, RiskSnapshot};
use crate::error::{Error, Result};
use crate::port::{PositionLedger, RiskCache};

/// Ledger and risk-cache queries over JSON-RPC.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    addresses: ContractAddresses,
}

impl ChainClient {
    /// Create a client reading the given deployment.
    pub fn new(provider: DynProvider, addresses: ContractAddresses) -> Self {
        Self {
            provider,
            addresses,
        }
    }

    fn helper(&self) -> Result<KeeperHelper::KeeperHelperInstance<&DynProvider>> {
        let address = self.addresses.require(Collaborator::KeeperHelper)?;
        Ok(KeeperHelper::new(address, &self.provider))
    }
}

fn read_failed(method: &str, err: impl std::fmt::Display) -> Error {
    Error::Chain(format!("{method} failed: {err}"))
}

fn to_ids(raw: Vec<U256>) -> Vec<PositionId> {
    raw.into_iter().map(PositionId::new).collect()
}

#[async_trait]
impl PositionLedger for ChainClient {
    async fn pending_positions(&self, collection: Address) -> Result<Vec<PositionId>> {
        let raw = self
            .helper()?
            .getPendingOptions(collection)
            .call()
            .await
            .map_err(|e| read_failed("getPendingOptions", e))?;
        Ok(to_ids(raw))
    }

    async fn active_positions(&self, collection: Address) -> Result<Vec<PositionId>> {
        let raw = self
            .helper()?
            .getActiveOptions(collection)
            .call()
            .await
            .map_err(|e| read_failed("getActiveOptions", e))?;
        Ok(to_ids(raw))
    }

    async fn expired_positions(&self, collection: Address) -> Result<Vec<PositionId>> {
        let raw = self
            .helper()?
            .getExpiredOptions(collection)
            .call()
            .await
            .map_err(|e| read_failed("getExpiredOptions", e))?;
        Ok(to_ids(raw))
    }

    async fn sum_pnl_weighted_delta(
        &self,
        collection: Address,
        ids: &[PositionId],
    ) -> Result<(I256, I256)> {
        let raw: Vec<U256> = ids.iter().map(PositionId::as_u256).collect();
        let sum = self
            .helper()?
            .sumPNLWeightedDelta(collection, raw)
            .call()
            .await
            .map_err(|e| read_failed("sumPNLWeightedDelta", e))?;
        Ok((sum.pnl, sum.weightedDelta))
    }

    async fn option_supply(&self, option_token: Address) -> Result<U256> {
        OptionToken::new(option_token, &self.provider)
            .totalSupply()
            .call()
            .await
            .map_err(|e| read_failed("totalSupply", e))
    }
}

#[async_trait]
impl RiskCache for ChainClient {
    async fn asset_risk(&self, collection: Address) -> Result<RiskSnapshot> {
        let address = self.addresses.require(Collaborator::RiskCache)?;
        let risk = AssetRiskCache::new(address, &self.provider)
            .getAssetRisk(collection)
            .call()
            .await
            .map_err(|e| read_failed("getAssetRisk", e))?;
        Ok(RiskSnapshot::new(risk.pnl, risk.delta))
    }
}
