//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  batch / risk / cycle   │
//!                    └────────────┬────────────┘
//!           ┌─────────────┬───────┴──────┬──────────────┐
//!           ▼             ▼              ▼              ▼
//!     ┌──────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐
//!     │  Ledger  │  │ RiskCache │  │ Submitter │  │ Registry  │
//!     └──────────┘  └───────────┘  └───────────┘  └───────────┘
//! ```
//!
//! The chain adapter implements the ledger, risk-cache and submitter ports
//! against the deployed contracts; the test kit implements them in memory.

pub mod outbound;

pub use outbound::ledger::PositionLedger;
pub use outbound::registry::MarketRegistry;
pub use outbound::risk_cache::RiskCache;
pub use outbound::submitter::TransactionSubmitter;
