//! Typed descriptions of the writes the keeper can request.

use std::fmt;

use alloy_primitives::{Address, B256};

use super::id::PositionId;
use super::position::Transition;
use super::risk::RiskSnapshot;

/// A state-changing contract call, handed to a transaction submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// One of the ledger's batched transitions over `ids`.
    Transition {
        /// Requested transition.
        transition: Transition,
        /// Collection address of the market.
        collection: Address,
        /// Positions to transition; a single id for fallback calls.
        ids: Vec<PositionId>,
    },
    /// `updateCollectionRisk(collection, delta, PNL)` on the risk cache.
    UpdateCollectionRisk {
        /// Collection address of the market.
        collection: Address,
        /// New cached values.
        snapshot: RiskSnapshot,
    },
    /// Protocol-wide `updateUnrealizedPNL()` on the vault.
    UpdateUnrealizedPnl,
}

impl ContractCall {
    /// Build a transition call.
    #[must_use]
    pub fn transition(transition: Transition, collection: Address, ids: Vec<PositionId>) -> Self {
        Self::Transition {
            transition,
            collection,
            ids,
        }
    }

    /// Contract method name, for logs.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Transition { transition, .. } => transition.batch_method(),
            Self::UpdateCollectionRisk { .. } => "updateCollectionRisk",
            Self::UpdateUnrealizedPnl => "updateUnrealizedPNL",
        }
    }

    /// Position ids carried by a transition call.
    #[must_use]
    pub fn ids(&self) -> &[PositionId] {
        match self {
            Self::Transition { ids, .. } => ids,
            _ => &[],
        }
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition {
                collection, ids, ..
            } => write!(f, "{}({collection}, {} ids)", self.method(), ids.len()),
            Self::UpdateCollectionRisk {
                collection,
                snapshot,
            } => write!(f, "{}({collection}, {snapshot})", self.method()),
            Self::UpdateUnrealizedPnl => write!(f, "{}()", self.method()),
        }
    }
}

/// Confirmed inclusion of a submitted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: B256,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Block that included it, when reported.
    pub block_number: Option<u64>,
}
