//! Keeper facade wiring the ports into the orchestrators.

use std::sync::Arc;

use tracing::{info_span, Instrument};

use super::fleet::Fleet;
use super::lifecycle::MarketLifecycle;
use super::report::{CycleReport, MarketReport};
use crate::application::batch::BatchExecutor;
use crate::application::risk::RiskSynchronizer;
use crate::domain::{
    BatchOutcome, Collaborator, Market, Materiality, PositionId, RiskSnapshot, TxReceipt,
};
use crate::error::{KeeperError, Result};
use crate::port::{MarketRegistry, PositionLedger, RiskCache, TransactionSubmitter};

/// The collaborators a keeper drives.
#[derive(Clone)]
pub struct KeeperPorts {
    /// Position ledger reads.
    pub ledger: Arc<dyn PositionLedger>,
    /// Risk cache reads.
    pub risk_cache: Arc<dyn RiskCache>,
    /// Write path for every transaction.
    pub submitter: Arc<dyn TransactionSubmitter>,
    /// Markets to drive.
    pub registry: Arc<dyn MarketRegistry>,
}

/// Read-only view of one market, for operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketStatus {
    /// Positions awaiting activation.
    pub pending: usize,
    /// Positions counted in risk.
    pub active: usize,
    /// Active positions past expiry.
    pub expired: usize,
    /// Currently cached risk.
    pub cached: RiskSnapshot,
}

/// Stateless keeper: every call re-reads the ledger.
pub struct Keeper {
    ports: KeeperPorts,
    fleet: Fleet,
}

impl Keeper {
    /// Build a keeper over `ports`, gating risk writes with `materiality`.
    pub fn new(ports: KeeperPorts, materiality: Materiality) -> Self {
        let executor = BatchExecutor::new(ports.submitter.clone());
        let synchronizer = RiskSynchronizer::new(
            ports.ledger.clone(),
            ports.risk_cache.clone(),
            ports.submitter.clone(),
            materiality,
        );
        let lifecycle = MarketLifecycle::new(ports.ledger.clone(), executor, synchronizer);
        let fleet = Fleet::new(ports.registry.clone(), lifecycle, ports.submitter.clone());
        Self { ports, fleet }
    }

    /// Run one pass over every market.
    ///
    /// # Errors
    ///
    /// See [`Fleet::process_all_markets`].
    pub async fn process_all_markets(&self) -> Result<CycleReport> {
        self.fleet.process_all_markets().await
    }

    /// Run one pass over a single market by name.
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorNotDeployed` for a missing global collaborator
    /// and `UnknownMarket` for an unregistered name, otherwise see
    /// [`MarketLifecycle::process_market`].
    pub async fn process_market(&self, name: &str) -> Result<MarketReport> {
        self.ports.registry.addresses().await?.ensure_deployed()?;
        let market = self.market(name).await?;
        let span = info_span!("market", name = %market.name());
        self.fleet
            .lifecycle()
            .process_market(&market)
            .instrument(span)
            .await
    }

    /// Force-close pending positions of a market.
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorNotDeployed` without sending anything when the
    /// keeper helper is missing, and `UnknownMarket` for an unregistered name.
    pub async fn cancel_pending(&self, name: &str, ids: &[PositionId]) -> Result<BatchOutcome> {
        self.ports
            .registry
            .addresses()
            .await?
            .require(Collaborator::KeeperHelper)?;
        let market = self.market(name).await?;
        self.fleet.lifecycle().cancel_pending(&market, ids).await
    }

    /// Zero a market's cached risk.
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorNotDeployed` when the risk cache is missing,
    /// `UnknownMarket` for an unregistered name, or the write failure.
    pub async fn reset_risk(&self, name: &str) -> Result<TxReceipt> {
        self.ports
            .registry
            .addresses()
            .await?
            .require(Collaborator::RiskCache)?;
        let market = self.market(name).await?;
        self.fleet.lifecycle().synchronizer().reset(&market).await
    }

    /// Read a market's position counts and cached risk without writing.
    ///
    /// # Errors
    ///
    /// Propagates read errors.
    pub async fn market_status(&self, market: &Market) -> Result<MarketStatus> {
        let collection = market.collection();
        let pending = self.ports.ledger.pending_positions(collection).await?;
        let active = self.ports.ledger.active_positions(collection).await?;
        let expired = self.ports.ledger.expired_positions(collection).await?;
        let cached = self.ports.risk_cache.asset_risk(collection).await?;
        Ok(MarketStatus {
            pending: pending.len(),
            active: active.len(),
            expired: expired.len(),
            cached,
        })
    }

    /// All registered markets.
    ///
    /// # Errors
    ///
    /// Propagates registry errors.
    pub async fn markets(&self) -> Result<Vec<Market>> {
        self.ports.registry.markets().await
    }

    /// Look up a registered market by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMarket` when no market has that name.
    pub async fn market(&self, name: &str) -> Result<Market> {
        self.markets()
            .await?
            .into_iter()
            .find(|m| m.name().as_str() == name)
            .ok_or_else(|| KeeperError::UnknownMarket(name.into()).into())
    }
}
