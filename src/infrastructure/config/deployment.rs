//! Deployment address book.
//!
//! Contract addresses are written by the deploy tooling into two JSON files
//! keyed by network name:
//!
//! ```json
//! // base file
//! { "KeeperHelper": { "sepolia": { "address": "0x.." } },
//!   "BAYC":         { "sepolia": { "address": "0x.." } } }
//!
//! // market file
//! { "OptionToken": { "sepolia": { "BAYC": "0x.." } } }
//! ```
//!
//! Explicit addresses in the TOML config win over the book. Anything still
//! missing resolves to `None` and fails with `CollaboratorNotDeployed` when
//! first used, except a market's collection, which is its identity and must
//! resolve at load time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use serde::Deserialize;

use super::settings::Config;
use crate::domain::{ContractAddresses, Market};
use crate::error::{ConfigError, Result};

const KEEPER_HELPER: &str = "KeeperHelper";
const RISK_CACHE: &str = "AssetRiskCache";
const VAULT: &str = "Vault";
const OPTION_TOKEN: &str = "OptionToken";

/// `[deployment]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    /// Base contracts and collections.
    pub base_file: PathBuf,
    /// Per-market option tokens.
    #[serde(default)]
    pub market_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    address: Option<Address>,
}

/// Parsed address book files.
#[derive(Debug, Default)]
pub struct AddressBook {
    base: HashMap<String, HashMap<String, Entry>>,
    market: HashMap<String, HashMap<String, HashMap<String, Address>>>,
}

impl AddressBook {
    /// Load the files named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AddressBook`] if a file cannot be read or parsed.
    pub fn load(config: &DeploymentConfig) -> Result<Self> {
        let base = read_json(&config.base_file)?;
        let market = match &config.market_file {
            Some(path) => read_json(path)?,
            None => HashMap::new(),
        };
        Ok(Self { base, market })
    }

    /// Parse address book contents directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AddressBook`] on malformed JSON.
    pub fn from_json(base: &str, market: &str) -> Result<Self> {
        Ok(Self {
            base: parse_json("<base>", base)?,
            market: parse_json("<market>", market)?,
        })
    }

    /// Address of a base contract or collection on `network`.
    #[must_use]
    pub fn address(&self, network: &str, name: &str) -> Option<Address> {
        self.base
            .get(name)
            .and_then(|networks| networks.get(network))
            .and_then(|entry| entry.address)
    }

    /// Option token of `market` on `network`.
    #[must_use]
    pub fn option_token(&self, network: &str, market: &str) -> Option<Address> {
        self.market
            .get(OPTION_TOKEN)
            .and_then(|networks| networks.get(network))
            .and_then(|markets| markets.get(market))
            .copied()
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::AddressBook {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    parse_json(&display, &content)
}

fn parse_json<T: for<'de> Deserialize<'de>>(path: &str, content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| {
        ConfigError::AddressBook {
            path: path.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Everything the keeper needs to know about the deployed protocol.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Global collaborators.
    pub addresses: ContractAddresses,
    /// Markets in configured order.
    pub markets: Vec<Market>,
}

impl Deployment {
    /// Resolve addresses from the config, falling back to the address book.
    ///
    /// # Errors
    ///
    /// Fails when the address book cannot be loaded or a market's collection
    /// address is unknown.
    pub fn resolve(config: &Config) -> Result<Self> {
        let book = match &config.deployment {
            Some(deployment) => AddressBook::load(deployment)?,
            None => AddressBook::default(),
        };
        Self::resolve_with(config, &book)
    }

    /// Resolve against an already loaded address book.
    ///
    /// # Errors
    ///
    /// Fails when a market's collection address is unknown.
    pub fn resolve_with(config: &Config, book: &AddressBook) -> Result<Self> {
        let network = config.network.name.as_str();
        let contracts = &config.contracts;
        let addresses = ContractAddresses {
            keeper_helper: contracts
                .keeper_helper
                .or_else(|| book.address(network, KEEPER_HELPER)),
            risk_cache: contracts
                .risk_cache
                .or_else(|| book.address(network, RISK_CACHE)),
            vault: contracts.vault.or_else(|| book.address(network, VAULT)),
        };

        let markets = config
            .markets
            .iter()
            .map(|m| {
                let collection = m
                    .collection
                    .or_else(|| book.address(network, &m.name))
                    .ok_or_else(|| ConfigError::InvalidValue {
                        field: "markets.collection",
                        reason: format!("no collection address for market {}", m.name),
                    })?;
                let option_token = m
                    .option_token
                    .or_else(|| book.option_token(network, &m.name));
                Ok(Market::new(m.name.as_str(), collection, m.weight, option_token))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { addresses, markets })
    }
}
