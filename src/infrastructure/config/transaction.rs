//! Transaction confirmation and fee settings.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::chain::TxPolicy;

/// `[transactions]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionConfig {
    /// Confirmations to wait for after inclusion.
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    /// Receipt wait limit in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed gas limit; estimated per call when unset.
    #[serde(default)]
    pub gas_limit: Option<u64>,
    /// EIP-1559 fee cap in wei. TOML integers stop at 64 bits.
    #[serde(default)]
    pub max_fee_per_gas: Option<u64>,
    /// EIP-1559 priority fee in wei.
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u64>,
}

fn default_confirmations() -> u64 {
    1
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            confirmations: default_confirmations(),
            timeout_secs: default_timeout_secs(),
            gas_limit: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        }
    }
}

impl TransactionConfig {
    /// Policy handed to the chain submitter.
    #[must_use]
    pub fn policy(&self) -> TxPolicy {
        TxPolicy {
            confirmations: self.confirmations,
            timeout: Duration::from_secs(self.timeout_secs),
            gas_limit: self.gas_limit,
            max_fee_per_gas: self.max_fee_per_gas.map(u128::from),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.map(u128::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_wait_for_one_confirmation() {
        let policy = TransactionConfig::default().policy();
        assert_eq!(policy.confirmations, 1);
        assert_eq!(policy.timeout, Duration::from_secs(120));
        assert!(policy.gas_limit.is_none());
    }

    #[test]
    fn overrides_flow_into_policy() {
        let config: TransactionConfig = toml::from_str(
            "confirmations = 3\ntimeout_secs = 30\ngas_limit = 3000000\nmax_fee_per_gas = 50000000000",
        )
        .unwrap();
        let policy = config.policy();
        assert_eq!(policy.confirmations, 3);
        assert_eq!(policy.gas_limit, Some(3_000_000));
        assert_eq!(policy.max_fee_per_gas, Some(50_000_000_000));
        assert_eq!(policy.max_priority_fee_per_gas, None);
    }

    #[test]
    fn both_fee_caps_parse() {
        let config: TransactionConfig =
            toml::from_str("max_fee_per_gas = 30000000000
max_priority_fee_per_gas = 1500000000")
                .unwrap();
        let policy = config.policy();
        assert_eq!(policy.max_fee_per_gas, Some(30_000_000_000));
        assert_eq!(policy.max_priority_fee_per_gas, Some(1_500_000_000));
    }
}
