//! Handler for `check config`.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::domain::{Collaborator, ContractAddresses};
use crate::error::Result;
use crate::infrastructure::config::deployment::Deployment;
use crate::infrastructure::config::settings::{Config, PRIVATE_KEY_ENV};

fn address_of(addresses: &ContractAddresses, collaborator: Collaborator) -> Option<String> {
    addresses.require(collaborator).ok().map(|a| a.to_string())
}

/// Validate the configuration file and resolve addresses without RPC calls.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    let deployment = Deployment::resolve(&config)?;
    let addresses = &deployment.addresses;
    let key_configured =
        config.wallet.private_key.is_some() || config.wallet.keystore_path.is_some();

    let globals = [
        Collaborator::KeeperHelper,
        Collaborator::RiskCache,
        Collaborator::Vault,
    ];

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "config": path.display().to_string(),
            "network": config.network.name,
            "chain_id": config.network.chain_id,
            "dry_run": config.dry_run,
            "key_configured": key_configured,
            "contracts": globals
                .iter()
                .map(|c| {
                    json!({
                        "name": c.to_string(),
                        "address": address_of(addresses, c.clone()),
                    })
                })
                .collect::<Vec<_>>(),
            "markets": deployment
                .markets
                .iter()
                .map(|m| json!({
                    "name": m.name().as_str(),
                    "collection": m.collection().to_string(),
                    "weight": m.weight().to_string(),
                    "option_token": m.option_token().ok().map(|a| a.to_string()),
                }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Network");
    output::field("Name", &config.network.name);
    output::field("Chain ID", config.network.chain_id);
    output::field("Dry run", config.dry_run);

    output::section("Contracts");
    for collaborator in globals {
        match address_of(addresses, collaborator.clone()) {
            Some(address) => output::field(&collaborator.to_string(), address),
            None => output::warning(&format!("{collaborator} is not deployed")),
        }
    }

    output::section("Markets");
    if deployment.markets.is_empty() {
        output::hint("no [[markets]] configured");
    }
    for market in &deployment.markets {
        output::field(market.name().as_str(), market.collection());
        if let Err(e) = market.option_token() {
            output::warning(&e.to_string());
        }
    }

    if key_configured {
        output::success("Signing key detected");
    } else {
        output::warning(&format!(
            "Signing key not configured (set {PRIVATE_KEY_ENV} or wallet.keystore_path)"
        ));
    }

    output::success("Configuration check complete");
    Ok(())
}
