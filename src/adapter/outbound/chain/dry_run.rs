//! Submitter that logs calls instead of sending them.

use alloy_primitives::B256;
use async_trait::async_trait;
use tracing::info;

use crate::domain::{ContractCall, TxReceipt};
use crate::error::Result;
use crate::port::TransactionSubmitter;

/// Logs every call and reports it as confirmed at no cost.
///
/// Reads still hit the chain, so a dry run shows exactly what a live cycle
/// would have sent against current state.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSubmitter;

#[async_trait]
impl TransactionSubmitter for DryRunSubmitter {
    async fn submit(&self, call: &ContractCall) -> Result<TxReceipt> {
        info!(call = %call, ids = ?call.ids(), "Dry run, not sending");
        Ok(TxReceipt {
            tx_hash: B256::ZERO,
            gas_used: 0,
            block_number: None,
        })
    }

    fn submitter_name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transition;
    use alloy_primitives::Address;

    #[tokio::test]
    async fn dry_run_confirms_without_gas() {
        let call = ContractCall::transition(Transition::Close, Address::ZERO, vec![1.into()]);
        let receipt = DryRunSubmitter.submit(&call).await.unwrap();
        assert_eq!(receipt.gas_used, 0);
        assert_eq!(receipt.tx_hash, B256::ZERO);
    }
}
