//! Submitting key configuration.

use serde::Deserialize;

/// Key used to sign every keeper transaction.
///
/// The raw key is read from `KEEPER_PRIVATE_KEY` at runtime, never from the
/// config file. An encrypted keystore may be configured instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Optional keystore path for encrypted key storage.
    #[serde(default)]
    pub keystore_path: Option<String>,
    /// Private key loaded from the environment.
    #[serde(skip)]
    pub private_key: Option<String>,
}
