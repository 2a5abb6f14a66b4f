//! On-chain collaborators over an alloy JSON-RPC provider.
//!
//! Reads go through [`ChainClient`]; writes go through [`ChainSubmitter`],
//! or [`DryRunSubmitter`] when nothing should reach the chain.

mod bindings;
mod client;
mod dry_run;
mod policy;
mod provider;
mod submitter;

pub use client::ChainClient;
pub use dry_run::DryRunSubmitter;
pub use policy::TxPolicy;
pub use provider::connect;
pub use submitter::ChainSubmitter;
