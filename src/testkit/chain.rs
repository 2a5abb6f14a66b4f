//! In-memory chain for exercising the keeper end to end.
//!
//! [`MockChain`] implements every outbound port at once: the position
//! ledger, the risk cache, the market registry and the transaction
//! submitter. Transition calls are validated against the position state
//! machine and applied atomically, so a batch containing one bad id changes
//! nothing, exactly as a reverted transaction would.
//!
//! Every submitted call is recorded, including the ones that fail, so tests
//! can assert on call counts and ordering.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::{Address, B256, I256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::orchestration::KeeperPorts;
use crate::domain::{
    Collaborator, ContractAddresses, ContractCall, Market, Position, PositionId, PositionState, RiskSnapshot,
    Transition, TxReceipt,
};
use crate::error::{Error, ExecutionError, KeeperError, Result};
use crate::port::{MarketRegistry, PositionLedger, RiskCache, TransactionSubmitter};

const BASE_GAS: u64 = 50_000;
const GAS_PER_ID: u64 = 10_000;

#[derive(Default)]
struct ChainState {
    now: u64,
    markets: Vec<Market>,
    positions: BTreeMap<PositionId, Position>,
    risk: HashMap<Address, RiskSnapshot>,
    supply_overrides: HashMap<Address, U256>,
    calls: Vec<ContractCall>,
    confirmed: Vec<ContractCall>,
    failing_batches: bool,
    poisoned: HashSet<PositionId>,
    failing_global_refresh: bool,
    undeployed: HashSet<Collaborator>,
    nonce: u64,
}

impl ChainState {
    fn require(&self, collaborator: Collaborator) -> Result<()> {
        if self.undeployed.contains(&collaborator) {
            return Err(KeeperError::CollaboratorNotDeployed { collaborator }.into());
        }
        Ok(())
    }

    fn ids_where(&self, collection: Address, keep: impl Fn(&Position) -> bool) -> Vec<PositionId> {
        self.positions
            .values()
            .filter(|p| p.collection == collection && keep(p))
            .map(|p| p.id)
            .collect()
    }

    fn apply_transition(
        &mut self,
        transition: Transition,
        collection: Address,
        ids: &[PositionId],
    ) -> Result<()> {
        self.require(Collaborator::KeeperHelper)?;
        if ids.len() > 1 && self.failing_batches {
            return Err(reverted("batch rejected"));
        }
        if let Some(id) = ids.iter().find(|id| self.poisoned.contains(id)) {
            return Err(reverted(format!("position {id} rejected")));
        }

        let mut next = Vec::with_capacity(ids.len());
        for id in ids {
            let position = self
                .positions
                .get(id)
                .filter(|p| p.collection == collection)
                .ok_or_else(|| invalid(*id, "unknown position"))?;
            if transition == Transition::Close && !position.is_expired_at(self.now) {
                return Err(invalid(*id, "position has not expired"));
            }
            let state = position
                .state
                .apply(transition)
                .map_err(|e| invalid(*id, e.to_string()))?;
            next.push((*id, state));
        }

        for (id, state) in next {
            if let Some(position) = self.positions.get_mut(&id) {
                position.state = state;
            }
        }
        Ok(())
    }

    fn apply(&mut self, call: &ContractCall) -> Result<()> {
        match call {
            ContractCall::Transition {
                transition,
                collection,
                ids,
            } => self.apply_transition(*transition, *collection, ids),
            ContractCall::UpdateCollectionRisk {
                collection,
                snapshot,
            } => {
                self.require(Collaborator::RiskCache)?;
                self.risk.insert(*collection, *snapshot);
                Ok(())
            }
            ContractCall::UpdateUnrealizedPnl => {
                self.require(Collaborator::Vault)?;
                if self.failing_global_refresh {
                    return Err(reverted("vault refresh rejected"));
                }
                Ok(())
            }
        }
    }
}

fn reverted(reason: impl Into<String>) -> Error {
    ExecutionError::TransactionReverted {
        tx_hash: None,
        reason: reason.into(),
    }
    .into()
}

fn invalid(id: PositionId, reason: impl Into<String>) -> Error {
    ExecutionError::InvalidStateTransition {
        position: id.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// In-memory ledger, risk cache, registry and submitter.
#[derive(Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    /// Empty chain at time zero with every collaborator deployed.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Ports backed by this chain.
    pub fn ports(self: &Arc<Self>) -> KeeperPorts {
        KeeperPorts {
            ledger: self.clone(),
            risk_cache: self.clone(),
            submitter: self.clone(),
            registry: self.clone(),
        }
    }

    // -- setup --------------------------------------------------------------

    /// Register a market.
    pub fn add_market(&self, market: Market) {
        self.state.lock().markets.push(market);
    }

    /// Insert or replace a position.
    pub fn add_position(&self, position: Position) {
        self.state.lock().positions.insert(position.id, position);
    }

    /// Set the chain timestamp used for expiry.
    pub fn set_now(&self, now: u64) {
        self.state.lock().now = now;
    }

    /// Seed the cached risk of a collection.
    pub fn set_cached_risk(&self, collection: Address, snapshot: RiskSnapshot) {
        self.state.lock().risk.insert(collection, snapshot);
    }

    /// Pin an option token's supply instead of deriving it from positions.
    pub fn set_option_supply(&self, option_token: Address, supply: U256) {
        self.state
            .lock()
            .supply_overrides
            .insert(option_token, supply);
    }

    // -- failure injection --------------------------------------------------

    /// Reject every multi-id transition.
    pub fn fail_batches(&self, fail: bool) {
        self.state.lock().failing_batches = fail;
    }

    /// Reject any transition that includes `id`.
    pub fn poison(&self, id: PositionId) {
        self.state.lock().poisoned.insert(id);
    }

    /// Reject the protocol-wide PNL refresh.
    pub fn fail_global_refresh(&self, fail: bool) {
        self.state.lock().failing_global_refresh = fail;
    }

    /// Treat a collaborator as not deployed.
    pub fn undeploy(&self, collaborator: Collaborator) {
        self.state.lock().undeployed.insert(collaborator);
    }

    // -- inspection ---------------------------------------------------------

    /// Every submitted call in order, including failed ones.
    pub fn calls(&self) -> Vec<ContractCall> {
        self.state.lock().calls.clone()
    }

    /// Calls that were applied.
    pub fn confirmed_calls(&self) -> Vec<ContractCall> {
        self.state.lock().confirmed.clone()
    }

    /// Number of submitted calls, including failed ones.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Submitted `transition` calls carrying more than one id.
    pub fn batch_calls(&self, transition: Transition) -> usize {
        self.count_transitions(transition, |n| n > 1)
    }

    /// Submitted `transition` calls carrying exactly one id.
    pub fn single_calls(&self, transition: Transition) -> usize {
        self.count_transitions(transition, |n| n == 1)
    }

    /// Submitted risk-cache writes.
    pub fn risk_writes(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ContractCall::UpdateCollectionRisk { .. }))
            .count()
    }

    /// Submitted protocol-wide PNL refreshes.
    pub fn global_refreshes(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ContractCall::UpdateUnrealizedPnl))
            .count()
    }

    /// Current cached risk of a collection.
    pub fn cached_risk(&self, collection: Address) -> RiskSnapshot {
        self.state
            .lock()
            .risk
            .get(&collection)
            .copied()
            .unwrap_or(RiskSnapshot::ZERO)
    }

    /// Current state of a position.
    pub fn state_of(&self, id: u64) -> Option<PositionState> {
        self.state
            .lock()
            .positions
            .get(&PositionId::from(id))
            .map(|p| p.state)
    }

    fn count_transitions(&self, wanted: Transition, size: impl Fn(usize) -> bool) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| match c {
                ContractCall::Transition {
                    transition, ids, ..
                } => *transition == wanted && size(ids.len()),
                _ => false,
            })
            .count()
    }
}

#[async_trait]
impl PositionLedger for MockChain {
    async fn pending_positions(&self, collection: Address) -> Result<Vec<PositionId>> {
        let state = self.state.lock();
        state.require(Collaborator::KeeperHelper)?;
        Ok(state.ids_where(collection, |p| p.state == PositionState::Pending))
    }

    async fn active_positions(&self, collection: Address) -> Result<Vec<PositionId>> {
        let state = self.state.lock();
        state.require(Collaborator::KeeperHelper)?;
        Ok(state.ids_where(collection, |p| p.state == PositionState::Active))
    }

    async fn expired_positions(&self, collection: Address) -> Result<Vec<PositionId>> {
        let state = self.state.lock();
        state.require(Collaborator::KeeperHelper)?;
        let now = state.now;
        Ok(state.ids_where(collection, |p| p.is_expired_at(now)))
    }

    async fn sum_pnl_weighted_delta(
        &self,
        collection: Address,
        ids: &[PositionId],
    ) -> Result<(I256, I256)> {
        let state = self.state.lock();
        state.require(Collaborator::KeeperHelper)?;
        let mut pnl = I256::ZERO;
        let mut weighted_delta = I256::ZERO;
        for id in ids {
            let position = state
                .positions
                .get(id)
                .filter(|p| p.collection == collection && p.state == PositionState::Active)
                .ok_or_else(|| Error::Chain(format!("position {id} is not active")))?;
            pnl += position.pnl;
            weighted_delta += position.weighted_delta;
        }
        Ok((pnl, weighted_delta))
    }

    async fn option_supply(&self, option_token: Address) -> Result<U256> {
        let state = self.state.lock();
        if let Some(supply) = state.supply_overrides.get(&option_token) {
            return Ok(*supply);
        }
        let market = state
            .markets
            .iter()
            .find(|m| m.option_token().ok() == Some(option_token))
            .ok_or_else(|| Error::Chain(format!("no contract at {option_token}")))?;
        let collection = market.collection();
        Ok(state
            .positions
            .values()
            .filter(|p| p.collection == collection && p.state == PositionState::Active)
            .fold(U256::ZERO, |acc, p| acc + p.amount))
    }
}

#[async_trait]
impl RiskCache for MockChain {
    async fn asset_risk(&self, collection: Address) -> Result<RiskSnapshot> {
        let state = self.state.lock();
        state.require(Collaborator::RiskCache)?;
        Ok(state
            .risk
            .get(&collection)
            .copied()
            .unwrap_or(RiskSnapshot::ZERO))
    }
}

#[async_trait]
impl MarketRegistry for MockChain {
    async fn markets(&self) -> Result<Vec<Market>> {
        Ok(self.state.lock().markets.clone())
    }

    async fn addresses(&self) -> Result<ContractAddresses> {
        let state = self.state.lock();
        let address = |collaborator: Collaborator, byte: u8| {
            (!state.undeployed.contains(&collaborator)).then(|| Address::repeat_byte(byte))
        };
        Ok(ContractAddresses {
            keeper_helper: address(Collaborator::KeeperHelper, 0xa1),
            risk_cache: address(Collaborator::RiskCache, 0xa2),
            vault: address(Collaborator::Vault, 0xa3),
        })
    }
}

#[async_trait]
impl TransactionSubmitter for MockChain {
    async fn submit(&self, call: &ContractCall) -> Result<TxReceipt> {
        let mut state = self.state.lock();
        state.calls.push(call.clone());
        state.apply(call)?;
        state.confirmed.push(call.clone());
        state.nonce += 1;
        let nonce = state.nonce;
        Ok(TxReceipt {
            tx_hash: B256::left_padding_from(&nonce.to_be_bytes()),
            gas_used: BASE_GAS + GAS_PER_ID * call.ids().len() as u64,
            block_number: Some(nonce),
        })
    }

    fn submitter_name(&self) -> &'static str {
        "mock"
    }
}
