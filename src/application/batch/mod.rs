//! Batch-with-fallback execution of ledger transitions.

pub mod executor;

pub use executor::{BatchExecutor, BatchOperation, TransitionOp};
