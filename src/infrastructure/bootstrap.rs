//! Composition root: turns a [`Config`] into a ready [`Keeper`].

use std::str::FromStr;
use std::sync::Arc;

use alloy_signer_local::PrivateKeySigner;
use tracing::{info, warn};
use url::Url;

use crate::adapter::outbound::chain::{self, ChainClient, ChainSubmitter, DryRunSubmitter};
use crate::adapter::outbound::registry::StaticMarketRegistry;
use crate::application::orchestration::{Keeper, KeeperPorts};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::deployment::Deployment;
use crate::infrastructure::config::settings::{Config, PRIVATE_KEY_ENV};
use crate::port::TransactionSubmitter;

/// A wired keeper together with what it was built from.
pub struct Runtime {
    /// The keeper.
    pub keeper: Keeper,
    /// Resolved contract addresses and markets.
    pub deployment: Deployment,
    /// Whether writes are logged instead of sent.
    pub dry_run: bool,
}

fn signer(config: &Config) -> Result<PrivateKeySigner> {
    let key = config.signing_key()?;
    // The provider's chain-id filler stamps every transaction.
    PrivateKeySigner::from_str(key.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field: PRIVATE_KEY_ENV,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Build the keeper for `config`.
///
/// `force_dry_run` overrides a `dry_run = false` in the file. A dry run needs
/// no signing key.
///
/// # Errors
///
/// Fails on an unresolvable deployment, a malformed RPC URL, or a missing or
/// invalid signing key.
pub fn build(config: &Config, force_dry_run: bool) -> Result<Runtime> {
    let deployment = Deployment::resolve(config)?;
    let rpc_url = Url::parse(&config.network.rpc_url)?;
    let dry_run = config.dry_run || force_dry_run;

    let (provider, submitter): (_, Arc<dyn TransactionSubmitter>) = if dry_run {
        warn!("Dry run: transactions will be logged, not sent");
        (chain::connect(rpc_url, None), Arc::new(DryRunSubmitter))
    } else {
        let signer = signer(config)?;
        info!(address = %signer.address(), chain_id = config.network.chain_id, "Signing key loaded");
        let provider = chain::connect(rpc_url, Some(signer));
        let submitter = ChainSubmitter::new(
            provider.clone(),
            deployment.addresses,
            config.transactions.policy(),
        );
        (provider, Arc::new(submitter))
    };

    let client = Arc::new(ChainClient::new(provider, deployment.addresses));
    let ports = KeeperPorts {
        ledger: client.clone(),
        risk_cache: client,
        submitter,
        registry: Arc::new(StaticMarketRegistry::new(
            deployment.markets.clone(),
            deployment.addresses,
        )),
    };

    info!(
        network = %config.network.name,
        markets = deployment.markets.len(),
        dry_run,
        "Keeper initialized"
    );

    Ok(Runtime {
        keeper: Keeper::new(ports, config.risk.materiality()),
        deployment,
        dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_needs_no_key() {
        let config = Config::parse_toml(
            r#"
dry_run = true

[network]
name = "localhost"
rpc_url = "http://127.0.0.1:8545"
chain_id = 31337
"#,
        )
        .unwrap();
        let runtime = build(&config, false).unwrap();
        assert!(runtime.dry_run);
        assert!(runtime.deployment.markets.is_empty());
    }

    const LOCAL: &str = r#"
[network]
name = "localhost"
rpc_url = "http://127.0.0.1:8545"
chain_id = 31337
"#;

    #[test]
    fn live_build_loads_hex_key() {
        let mut config = Config::parse_toml(LOCAL).unwrap();
        // Well-known first development account of a local node.
        config.wallet.private_key =
            Some("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".into());

        let runtime = build(&config, false).unwrap();
        assert!(!runtime.dry_run);
    }

    #[test]
    fn live_build_rejects_malformed_key() {
        let mut config = Config::parse_toml(LOCAL).unwrap();
        config.wallet.private_key = Some("not-a-key".into());

        let err = build(&config, false).err().unwrap();
        assert!(err.to_string().contains(PRIVATE_KEY_ENV));
    }
}
