//! Surge keeper - off-chain controller for an NFT options protocol.
//!
//! The keeper drives option positions through their on-chain lifecycle and
//! keeps the protocol's cached risk in step with the positions it counts.
//! Each pass over a market closes expired positions, refreshes the market's
//! cached `{PNL, delta}` when it moved enough to matter, and activates
//! pending positions. After every market has run, the vault's protocol-wide
//! unrealized PNL is refreshed once if any market's risk changed.
//!
//! # Architecture
//!
//! - [`domain`] - Positions, markets, risk snapshots and fixed-point math
//! - [`port`] - Traits for the ledger, risk cache, registry and submitter
//! - [`application`] - Batch executor, risk synchronizer and orchestrators
//! - [`adapter`] - alloy chain adapter and the `clap` CLI
//! - [`infrastructure`] - Configuration, address book and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use surge_keeper::infrastructure::bootstrap;
//! use surge_keeper::infrastructure::config::settings::Config;
//!
//! # async fn run() -> surge_keeper::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let runtime = bootstrap::build(&config, true)?;
//! let report = runtime.keeper.process_all_markets().await?;
//! println!("closed {} positions", report.positions_closed());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
