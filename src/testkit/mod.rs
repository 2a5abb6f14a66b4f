//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`] - `MockChain`, an in-memory ledger, risk cache, registry and
//!   submitter with call recording and failure injection.
//! - [`domain`] - Builders for markets, positions and fixed-point values.

pub mod chain;
pub mod domain;
