//! Domain validation errors.
//!
//! These errors are raised when a pure domain rule is violated, before any
//! call reaches the chain.

use thiserror::Error;

use super::position::{PositionState, Transition};

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The requested transition does not exist from the current state.
    #[error("cannot {transition} a position in state {from}")]
    InvalidStateTransition {
        /// State the position is currently in.
        from: PositionState,
        /// Transition that was requested.
        transition: Transition,
    },

    /// Fixed-point arithmetic left the 256-bit range.
    #[error("fixed-point overflow while computing {what}")]
    Overflow {
        /// Quantity being computed.
        what: &'static str,
    },

    /// Division by a zero denominator.
    #[error("division by zero while computing {what}")]
    DivisionByZero {
        /// Quantity being computed.
        what: &'static str,
    },
}
