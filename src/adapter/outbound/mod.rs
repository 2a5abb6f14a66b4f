//! Outbound adapters (driven side).

pub mod chain;
pub mod registry;
