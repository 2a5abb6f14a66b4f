//! Position lifecycle state machine.
//!
//! ```text
//! PENDING --activate--> ACTIVE --close(at/after expiry)--> CLOSED
//! PENDING --forceClosePending--> CANCELED
//! ```
//!
//! The keeper never mutates positions itself. The ledger enforces this machine
//! and the keeper only requests transitions; the types here let the keeper
//! (and the in-memory test ledger) reason about which requests are valid.

use std::fmt;

use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::PositionId;

/// Lifecycle state of a position on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    /// Premium escrowed, not yet counted in aggregate risk.
    Pending,
    /// Counted in aggregate risk.
    Active,
    /// Settled at or after expiry.
    Closed,
    /// Force-closed while still pending; premium refunded.
    Canceled,
}

impl PositionState {
    /// Apply a transition, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] when the transition does
    /// not start from this state. Terminal states accept no transitions.
    pub fn apply(self, transition: Transition) -> Result<Self, DomainError> {
        match (self, transition) {
            (Self::Pending, Transition::Activate) => Ok(Self::Active),
            (Self::Pending, Transition::ForceClosePending) => Ok(Self::Canceled),
            (Self::Active, Transition::Close) => Ok(Self::Closed),
            (from, transition) => Err(DomainError::InvalidStateTransition { from, transition }),
        }
    }

    /// True for `Closed` and `Canceled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Canceled)
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
            Self::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

/// A ledger-side state transition the keeper can request in batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// `PENDING -> ACTIVE`.
    Activate,
    /// `ACTIVE -> CLOSED`, settling the payout.
    Close,
    /// `PENDING -> CANCELED`, refunding the premium.
    ForceClosePending,
}

impl Transition {
    /// Name of the batched ledger method implementing this transition.
    #[must_use]
    pub const fn batch_method(self) -> &'static str {
        match self {
            Self::Activate => "batchActivateOptions",
            Self::Close => "batchCloseOptions",
            Self::ForceClosePending => "batchForceClosePendingPositions",
        }
    }

    /// State a position must be in for this transition to apply.
    #[must_use]
    pub const fn source_state(self) -> PositionState {
        match self {
            Self::Activate | Self::ForceClosePending => PositionState::Pending,
            Self::Close => PositionState::Active,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Activate => "activate",
            Self::Close => "close",
            Self::ForceClosePending => "cancel",
        };
        f.write_str(s)
    }
}

/// One outstanding option-like position as recorded by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Ledger identifier.
    pub id: PositionId,
    /// Collection address of the owning market.
    pub collection: Address,
    /// Strike price, 18 decimals.
    pub strike: U256,
    /// Expiry as a unix timestamp in seconds.
    pub expiry: u64,
    /// Notional amount, 18 decimals.
    pub amount: U256,
    /// Current lifecycle state.
    pub state: PositionState,
    /// Mark-to-market PNL contribution, 18 decimals.
    pub pnl: I256,
    /// Notional-weighted delta contribution, 36 decimals before normalization.
    pub weighted_delta: I256,
}

impl Position {
    /// An active position is eligible to close once `now` reaches expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.state == PositionState::Active && now >= self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_activate_or_cancel() {
        assert_eq!(
            PositionState::Pending.apply(Transition::Activate),
            Ok(PositionState::Active)
        );
        assert_eq!(
            PositionState::Pending.apply(Transition::ForceClosePending),
            Ok(PositionState::Canceled)
        );
    }

    #[test]
    fn active_can_only_close() {
        assert_eq!(
            PositionState::Active.apply(Transition::Close),
            Ok(PositionState::Closed)
        );
        assert_eq!(
            PositionState::Active.apply(Transition::Activate),
            Err(DomainError::InvalidStateTransition {
                from: PositionState::Active,
                transition: Transition::Activate,
            })
        );
        assert!(PositionState::Active
            .apply(Transition::ForceClosePending)
            .is_err());
    }

    #[test]
    fn terminal_states_reject_everything() {
        for state in [PositionState::Closed, PositionState::Canceled] {
            assert!(state.is_terminal());
            for transition in [
                Transition::Activate,
                Transition::Close,
                Transition::ForceClosePending,
            ] {
                assert!(state.apply(transition).is_err(), "{state} accepted {transition}");
            }
        }
    }

    #[test]
    fn pending_cannot_close() {
        let err = PositionState::Pending.apply(Transition::Close).unwrap_err();
        assert_eq!(err.to_string(), "cannot close a position in state PENDING");
    }

    #[test]
    fn batch_method_names_match_ledger() {
        assert_eq!(Transition::Activate.batch_method(), "batchActivateOptions");
        assert_eq!(Transition::Close.batch_method(), "batchCloseOptions");
        assert_eq!(
            Transition::ForceClosePending.batch_method(),
            "batchForceClosePendingPositions"
        );
    }

    #[test]
    fn expiry_only_applies_to_active_positions() {
        let mut position = Position {
            id: PositionId::from(1),
            collection: Address::ZERO,
            strike: U256::ZERO,
            expiry: 100,
            amount: U256::ZERO,
            state: PositionState::Active,
            pnl: I256::ZERO,
            weighted_delta: I256::ZERO,
        };
        assert!(!position.is_expired_at(99));
        assert!(position.is_expired_at(100));

        position.state = PositionState::Pending;
        assert!(!position.is_expired_at(1_000));
    }
}
