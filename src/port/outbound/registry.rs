//! Market registry port.

use async_trait::async_trait;

use crate::domain::{ContractAddresses, Market};
use crate::error::Result;

/// Source of the markets the keeper drives each cycle.
#[async_trait]
pub trait MarketRegistry: Send + Sync {
    /// All configured markets, in processing order.
    async fn markets(&self) -> Result<Vec<Market>>;

    /// Addresses of the protocol-wide collaborators.
    async fn addresses(&self) -> Result<ContractAddresses>;
}
