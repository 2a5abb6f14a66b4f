//! Protocol-agnostic keeper domain: identifiers, positions, risk and batch results.
//!
//! Nothing in this module talks to the chain. The types here describe what the
//! ledger reports and what the keeper asks it to do.

pub mod batch;
pub mod call;
pub mod error;
pub mod fixed;
pub mod id;
pub mod market;
pub mod position;
pub mod risk;

pub use batch::{BatchMode, BatchOutcome};
pub use call::{ContractCall, TxReceipt};
pub use error::DomainError;
pub use id::{MarketName, PositionId};
pub use market::{Collaborator, ContractAddresses, Market};
pub use position::{Position, PositionState, Transition};
pub use risk::{Materiality, RiskSnapshot};
