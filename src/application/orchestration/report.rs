//! Cycle reports handed back to the CLI and logs.

use chrono::{DateTime, Utc};

use crate::application::risk::SyncOutcome;
use crate::domain::{BatchOutcome, MarketName, TxReceipt};

/// What one market's pass did.
#[derive(Debug, Clone)]
pub struct MarketReport {
    /// Market processed.
    pub market: MarketName,
    /// Expired positions closed.
    pub closed: BatchOutcome,
    /// Risk synchronization result.
    pub risk: SyncOutcome,
    /// Pending positions activated.
    pub activated: BatchOutcome,
}

impl MarketReport {
    /// A risk write happened, so the protocol-wide PNL is stale.
    #[must_use]
    pub const fn needs_global_pnl_update(&self) -> bool {
        self.risk.updated()
    }

    /// Positions that failed to close or activate.
    #[must_use]
    pub fn failed_positions(&self) -> usize {
        self.closed.failed().len() + self.activated.failed().len()
    }
}

/// A market whose pass failed without aborting the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketFailure {
    /// Market that failed.
    pub market: MarketName,
    /// Error rendered for operators.
    pub reason: String,
}

/// What one fleet pass did.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// When the pass finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Markets that completed.
    pub markets: Vec<MarketReport>,
    /// Markets that failed.
    pub failures: Vec<MarketFailure>,
    /// Receipt of the protocol-wide refresh, if one was issued.
    pub global_refresh: Option<TxReceipt>,
}

impl CycleReport {
    /// Start an empty report.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            markets: Vec::new(),
            failures: Vec::new(),
            global_refresh: None,
        }
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Any completed market wrote its risk cache.
    #[must_use]
    pub fn needs_global_pnl_update(&self) -> bool {
        self.markets.iter().any(MarketReport::needs_global_pnl_update)
    }

    /// Positions closed across all markets.
    #[must_use]
    pub fn positions_closed(&self) -> usize {
        self.markets.iter().map(|m| m.closed.succeeded().len()).sum()
    }

    /// Positions activated across all markets.
    #[must_use]
    pub fn positions_activated(&self) -> usize {
        self.markets.iter().map(|m| m.activated.succeeded().len()).sum()
    }

    /// Positions left stuck by per-item failures.
    #[must_use]
    pub fn failed_positions(&self) -> usize {
        self.markets.iter().map(MarketReport::failed_positions).sum()
    }

    /// Risk cache writes made.
    #[must_use]
    pub fn risk_updates(&self) -> usize {
        self.markets.iter().filter(|m| m.risk.updated()).count()
    }

    /// Gas consumed by every confirmed transaction in the pass.
    #[must_use]
    pub fn gas_used(&self) -> u64 {
        let markets: u64 = self
            .markets
            .iter()
            .map(|m| {
                m.closed.gas_used()
                    + m.activated.gas_used()
                    + m.risk.receipt.map_or(0, |r| r.gas_used)
            })
            .sum();
        markets + self.global_refresh.map_or(0, |r| r.gas_used)
    }

    /// True when every market completed with no stuck positions.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.failed_positions() == 0
    }
}
