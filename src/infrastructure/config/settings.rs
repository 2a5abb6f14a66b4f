//! Keeper configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all keeper settings.
//! Configuration is loaded from a TOML file; the submitting key comes from the
//! `KEEPER_PRIVATE_KEY` environment variable or an encrypted keystore.
//!
//! # Example
//!
//! ```no_run
//! use surge_keeper::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::deployment::DeploymentConfig;
use super::logging::LoggingConfig;
use super::transaction::TransactionConfig;
use super::wallet::WalletConfig;
use crate::domain::Materiality;
use crate::error::{ConfigError, Result};

/// Environment variable holding the submitting key.
pub const PRIVATE_KEY_ENV: &str = "KEEPER_PRIVATE_KEY";

/// `[network]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Network name, the key used inside address book files.
    pub name: String,
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Chain id used for transaction signing.
    pub chain_id: u64,
}

/// `[contracts]` section. Explicit addresses override the address book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub keeper_helper: Option<Address>,
    #[serde(default)]
    pub risk_cache: Option<Address>,
    #[serde(default)]
    pub vault: Option<Address>,
}

/// One `[[markets]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Market name, also its key in the address book.
    pub name: String,
    /// Share of vault capital allocated to the market.
    pub weight: Decimal,
    /// Collection address; looked up in the address book when unset.
    #[serde(default)]
    pub collection: Option<Address>,
    /// Option token address; looked up in the address book when unset.
    #[serde(default)]
    pub option_token: Option<Address>,
}

/// Materiality rule selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialityKind {
    /// Write when the change is large relative to the cached value.
    #[default]
    Relative,
    /// Write on any change at all.
    AnyChange,
}

/// `[risk]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub materiality: MaterialityKind,
    /// A relative change is material when `|new - old| * change_scale > |old|`.
    #[serde(default = "default_change_scale")]
    pub change_scale: u64,
}

fn default_change_scale() -> u64 {
    100
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            materiality: MaterialityKind::default(),
            change_scale: default_change_scale(),
        }
    }
}

impl RiskConfig {
    /// Rule handed to the risk synchronizer.
    #[must_use]
    pub const fn materiality(&self) -> Materiality {
        match self.materiality {
            MaterialityKind::Relative => Materiality::Relative {
                scale: self.change_scale,
            },
            MaterialityKind::AnyChange => Materiality::AnyChange,
        }
    }
}

/// `[schedule]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between the start of one cycle and the next in `run` mode.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    300
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    /// Interval as a duration.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Main keeper configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Log writes instead of sending them.
    #[serde(default)]
    pub dry_run: bool,

    /// RPC endpoint and chain.
    pub network: NetworkConfig,

    /// Explicit global contract addresses.
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Address book written by the deploy tooling.
    #[serde(default)]
    pub deployment: Option<DeploymentConfig>,

    /// Markets to drive, in processing order.
    #[serde(default)]
    pub markets: Vec<MarketConfig>,

    /// Risk-cache write gating.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Confirmation and fee settings.
    #[serde(default)]
    pub transactions: TransactionConfig,

    /// Cycle interval for `run`.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Submitting key.
    #[serde(default)]
    pub wallet: WalletConfig,
}

fn read_keystore_password() -> Result<String> {
    if let Ok(password) = std::env::var("KEEPER_KEYSTORE_PASSWORD") {
        return Ok(password);
    }
    if let Ok(path) = std::env::var("KEEPER_KEYSTORE_PASSWORD_FILE") {
        let contents = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let password = contents.trim().to_string();
        if password.is_empty() {
            return Err(ConfigError::MissingField {
                field: "KEEPER_KEYSTORE_PASSWORD_FILE",
            }
            .into());
        }
        return Ok(password);
    }

    Err(ConfigError::MissingField {
        field: "KEEPER_KEYSTORE_PASSWORD",
    }
    .into())
}

fn decrypt_keystore_private_key(path: &str, password: &str) -> Result<String> {
    use alloy_signer_local::PrivateKeySigner;

    let signer = PrivateKeySigner::decrypt_keystore(path, password).map_err(|e| {
        ConfigError::InvalidValue {
            field: "keystore_path",
            reason: e.to_string(),
        }
    })?;
    Ok(format!("{:x}", signer.to_bytes()))
}

impl Config {
    /// Parse configuration from TOML content and validate it.
    ///
    /// The private key is taken from `KEEPER_PRIVATE_KEY`; the keystore is only
    /// decrypted when a signing key is actually requested, see
    /// [`Config::signing_key`].
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Never read from the config file.
        config.wallet.private_key = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the content is malformed,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// The submitting key, decrypting the keystore if no raw key is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when neither source is configured.
    pub fn signing_key(&self) -> Result<String> {
        if let Some(key) = &self.wallet.private_key {
            return Ok(key.clone());
        }
        if let Some(path) = &self.wallet.keystore_path {
            let password = read_keystore_password()?;
            return decrypt_keystore_private_key(path, &password);
        }
        Err(ConfigError::MissingField {
            field: PRIVATE_KEY_ENV,
        }
        .into())
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.network.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.rpc_url",
            }
            .into());
        }
        if self.network.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.name",
            }
            .into());
        }
        if self.risk.change_scale == 0 {
            return Err(ConfigError::InvalidValue {
                field: "risk.change_scale",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.transactions.confirmations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transactions.confirmations",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.transactions.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transactions.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "schedule.interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let mut names = HashSet::new();
        let mut total_weight = Decimal::ZERO;
        for market in &self.markets {
            if market.name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "markets.name",
                }
                .into());
            }
            if !names.insert(market.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "markets.name",
                    reason: format!("duplicate market {}", market.name),
                }
                .into());
            }
            if market.weight < Decimal::ZERO || market.weight > Decimal::ONE {
                return Err(ConfigError::InvalidValue {
                    field: "markets.weight",
                    reason: format!("weight of {} must be between 0 and 1", market.name),
                }
                .into());
            }
            total_weight += market.weight;
        }
        if total_weight > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "markets.weight",
                reason: format!("weights sum to {total_weight}, more than 1"),
            }
            .into());
        }

        Ok(())
    }
}
