//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the on-chain collaborators the keeper reads from
//! and writes to.

pub mod ledger;
pub mod registry;
pub mod risk_cache;
pub mod submitter;
