//! Signed transaction submission with confirmation tracking.

use alloy_contract::{CallBuilder, CallDecoder};
use alloy_primitives::{Address, U256};
use alloy_provider::network::ReceiptResponse as _;
use alloy_provider::{DynProvider, PendingTransactionError, WatchTxError};
use alloy_sol_types::{decode_revert_reason, SolError};
use async_trait::async_trait;
use tracing::{info, warn};

use super::bindings::{AssetRiskCache, KeeperHelper, Vault};
use super::policy::TxPolicy;
use crate::domain::{
    Collaborator, ContractAddresses, ContractCall, PositionId, Transition, TxReceipt,
};
use crate::error::{Error, ExecutionError, Result};
use crate::port::TransactionSubmitter;

/// Sends each call from the configured key and waits for its receipt.
pub struct ChainSubmitter {
    provider: DynProvider,
    addresses: ContractAddresses,
    policy: TxPolicy,
}

impl ChainSubmitter {
    /// Create a submitter. `provider` must carry a signing wallet.
    pub fn new(provider: DynProvider, addresses: ContractAddresses, policy: TxPolicy) -> Self {
        Self {
            provider,
            addresses,
            policy,
        }
    }

    async fn transition(
        &self,
        transition: Transition,
        collection: Address,
        ids: &[PositionId],
    ) -> Result<TxReceipt> {
        let address = self.addresses.require(Collaborator::KeeperHelper)?;
        let helper = KeeperHelper::new(address, self.provider.clone());
        let raw: Vec<U256> = ids.iter().map(PositionId::as_u256).collect();
        let method = transition.batch_method();
        match transition {
            Transition::Activate => {
                self.send(helper.batchActivateOptions(collection, raw), method)
                    .await
            }
            Transition::Close => self.send(helper.batchCloseOptions(collection, raw), method).await,
            Transition::ForceClosePending => {
                self.send(helper.batchForceClosePendingPositions(collection, raw), method)
                    .await
            }
        }
    }

    async fn send<D>(
        &self,
        call: CallBuilder<&DynProvider, D>,
        method: &'static str,
    ) -> Result<TxReceipt>
    where
        D: CallDecoder + Send + Sync,
    {
        let mut call = call;
        if let Some(gas) = self.policy.gas_limit {
            call = call.gas(gas);
        }
        if let Some(fee) = self.policy.max_fee_per_gas {
            call = call.max_fee_per_gas(fee);
        }
        if let Some(tip) = self.policy.max_priority_fee_per_gas {
            call = call.max_priority_fee_per_gas(tip);
        }

        let pending = call.send().await.map_err(classify_send_error)?;
        let tx_hash = *pending.tx_hash();
        info!(method, tx_hash = %tx_hash, "Transaction sent");

        let receipt = pending
            .with_required_confirmations(self.policy.confirmations)
            .with_timeout(Some(self.policy.timeout))
            .get_receipt()
            .await
            .map_err(|e| match e {
                PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
                    ExecutionError::ConfirmationTimeout {
                        tx_hash: tx_hash.to_string(),
                        waited_secs: self.policy.timeout.as_secs(),
                    }
                }
                other => {
                    ExecutionError::SubmissionFailed(format!("failed to get receipt: {other}"))
                }
            })?;

        if !receipt.status() {
            warn!(method, tx_hash = %tx_hash, "Transaction reverted");
            return Err(ExecutionError::TransactionReverted {
                tx_hash: Some(tx_hash.to_string()),
                reason: "execution reverted".into(),
            }
            .into());
        }

        info!(
            method,
            tx_hash = %tx_hash,
            gas_used = receipt.gas_used,
            block = ?receipt.block_number,
            "Transaction confirmed"
        );

        Ok(TxReceipt {
            tx_hash,
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
        })
    }
}

/// Map a pre-send failure (usually a revert during gas estimation).
fn classify_send_error(err: alloy_contract::Error) -> Error {
    if let Some(data) = err.as_revert_data() {
        if let Ok(rejected) = KeeperHelper::InvalidStateTransition::abi_decode(&data) {
            return ExecutionError::InvalidStateTransition {
                position: PositionId::new(rejected.positionId).to_string(),
                reason: format!("ledger reports state {}", rejected.currentState),
            }
            .into();
        }
        let reason = decode_revert_reason(&data).unwrap_or_else(|| "execution reverted".into());
        return ExecutionError::TransactionReverted {
            tx_hash: None,
            reason,
        }
        .into();
    }

    let message = err.to_string();
    if message.contains("revert") {
        return ExecutionError::TransactionReverted {
            tx_hash: None,
            reason: message,
        }
        .into();
    }
    ExecutionError::SubmissionFailed(message).into()
}

#[async_trait]
impl TransactionSubmitter for ChainSubmitter {
    async fn submit(&self, call: &ContractCall) -> Result<TxReceipt> {
        match call {
            ContractCall::Transition {
                transition,
                collection,
                ids,
            } => self.transition(*transition, *collection, ids).await,
            ContractCall::UpdateCollectionRisk {
                collection,
                snapshot,
            } => {
                let address = self.addresses.require(Collaborator::RiskCache)?;
                let cache = AssetRiskCache::new(address, self.provider.clone());
                self.send(
                    cache.updateCollectionRisk(*collection, snapshot.delta, snapshot.pnl),
                    call.method(),
                )
                .await
            }
            ContractCall::UpdateUnrealizedPnl => {
                let address = self.addresses.require(Collaborator::Vault)?;
                let vault = Vault::new(address, self.provider.clone());
                self.send(vault.updateUnrealizedPNL(), call.method()).await
            }
        }
    }

    fn submitter_name(&self) -> &'static str {
        "chain"
    }
}
