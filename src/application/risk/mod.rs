//! Risk cache synchronization.
//!
//! Keeps each market's cached `{PNL, delta}` in line with the ledger's active
//! set while avoiding writes that would not move the cache materially.

pub mod synchronizer;

pub use synchronizer::{RiskSynchronizer, SyncOutcome};
