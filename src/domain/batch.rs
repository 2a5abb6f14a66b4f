//! Tagged result of a batch-with-fallback run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::id::PositionId;

/// Which path a batch run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Nothing to do; no transaction was submitted.
    Skipped,
    /// The single combined transaction succeeded.
    Batch,
    /// The combined transaction failed and every id was retried alone.
    Fallback,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Skipped => "skipped",
            Self::Batch => "batch",
            Self::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// Outcome of one batch-with-fallback run.
///
/// `submitted()` is the number of ids handed in, which callers use to decide
/// whether downstream work is warranted. It is not the success count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    mode: BatchMode,
    submitted: usize,
    succeeded: BTreeSet<PositionId>,
    failed: BTreeMap<PositionId, String>,
    gas_used: u64,
    transactions: usize,
}

impl BatchOutcome {
    /// Outcome for an empty id set.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            mode: BatchMode::Skipped,
            submitted: 0,
            succeeded: BTreeSet::new(),
            failed: BTreeMap::new(),
            gas_used: 0,
            transactions: 0,
        }
    }

    /// Outcome when the combined transaction confirmed.
    #[must_use]
    pub fn batched(ids: &[PositionId], gas_used: u64) -> Self {
        Self {
            mode: BatchMode::Batch,
            submitted: ids.len(),
            succeeded: ids.iter().copied().collect(),
            failed: BTreeMap::new(),
            gas_used,
            transactions: 1,
        }
    }

    /// Start a fallback outcome; the failed batch attempt counts as one transaction.
    #[must_use]
    pub fn fallback(submitted: usize) -> Self {
        Self {
            mode: BatchMode::Fallback,
            submitted,
            succeeded: BTreeSet::new(),
            failed: BTreeMap::new(),
            gas_used: 0,
            transactions: 1,
        }
    }

    /// Record a per-id success during fallback.
    pub fn record_success(&mut self, id: PositionId, gas_used: u64) {
        self.succeeded.insert(id);
        self.gas_used = self.gas_used.saturating_add(gas_used);
        self.transactions += 1;
    }

    /// Record a per-id failure during fallback.
    pub fn record_failure(&mut self, id: PositionId, reason: impl Into<String>) {
        self.failed.insert(id, reason.into());
        self.transactions += 1;
    }

    /// Path taken.
    #[must_use]
    pub const fn mode(&self) -> BatchMode {
        self.mode
    }

    /// Number of ids originally submitted.
    #[must_use]
    pub const fn submitted(&self) -> usize {
        self.submitted
    }

    /// Ids that transitioned.
    #[must_use]
    pub fn succeeded(&self) -> &BTreeSet<PositionId> {
        &self.succeeded
    }

    /// Ids that failed, with the recorded reason.
    #[must_use]
    pub fn failed(&self) -> &BTreeMap<PositionId, String> {
        &self.failed
    }

    /// True when at least one id failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Gas consumed by confirmed transactions.
    #[must_use]
    pub const fn gas_used(&self) -> u64 {
        self.gas_used
    }

    /// Transactions attempted, including a failed batch attempt.
    #[must_use]
    pub const fn transactions(&self) -> usize {
        self.transactions
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} submitted, {} ok, {} failed ({})",
            self.submitted,
            self.succeeded.len(),
            self.failed.len(),
            self.mode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_is_empty() {
        let outcome = BatchOutcome::skipped();
        assert_eq!(outcome.mode(), BatchMode::Skipped);
        assert_eq!(outcome.submitted(), 0);
        assert_eq!(outcome.transactions(), 0);
        assert!(!outcome.has_failures());
    }

    #[test]
    fn fallback_tracks_both_sides() {
        let mut outcome = BatchOutcome::fallback(3);
        outcome.record_success(PositionId::from(1), 50_000);
        outcome.record_failure(PositionId::from(2), "reverted");
        outcome.record_success(PositionId::from(3), 40_000);

        assert_eq!(outcome.submitted(), 3);
        assert_eq!(outcome.succeeded().len(), 2);
        assert_eq!(outcome.failed().get(&PositionId::from(2)).unwrap(), "reverted");
        assert_eq!(outcome.gas_used(), 90_000);
        assert_eq!(outcome.transactions(), 4);
        assert_eq!(outcome.to_string(), "3 submitted, 2 ok, 1 failed (fallback)");
    }
}
