use std::time::Duration;

/// Confirmation and fee settings applied to every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxPolicy {
    /// Blocks to wait for after inclusion.
    pub confirmations: u64,
    /// Give up waiting for the receipt after this long.
    pub timeout: Duration,
    /// Fixed gas limit instead of estimation.
    pub gas_limit: Option<u64>,
    /// EIP-1559 fee cap in wei.
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 tip in wei.
    pub max_priority_fee_per_gas: Option<u128>,
}

impl Default for TxPolicy {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: Duration::from_secs(120),
            gas_limit: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        }
    }
}
