//! Market registry backed by the resolved deployment.

use async_trait::async_trait;

use crate::domain::{ContractAddresses, Market};
use crate::error::Result;
use crate::port::MarketRegistry;

/// Fixed markets and addresses resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketRegistry {
    markets: Vec<Market>,
    addresses: ContractAddresses,
}

impl StaticMarketRegistry {
    /// Serve `markets` in the given order alongside the global `addresses`.
    pub fn new(markets: Vec<Market>, addresses: ContractAddresses) -> Self {
        Self { markets, addresses }
    }
}

#[async_trait]
impl MarketRegistry for StaticMarketRegistry {
    async fn markets(&self) -> Result<Vec<Market>> {
        Ok(self.markets.clone())
    }

    async fn addresses(&self) -> Result<ContractAddresses> {
        Ok(self.addresses)
    }
}
