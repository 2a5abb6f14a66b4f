//! Transaction submission port.

use async_trait::async_trait;

use crate::domain::{ContractCall, TxReceipt};
use crate::error::Result;

/// Submits one state-changing call and waits for it to confirm.
///
/// Implementations perform no retries; retry policy belongs to the caller.
///
/// # Errors
///
/// - `ExecutionError::TransactionReverted` if the call is rejected on chain
/// - `ExecutionError::ConfirmationTimeout` if it is not included in time
/// - `ExecutionError::InvalidStateTransition` if the ledger rejects a position
/// - `KeeperError::CollaboratorNotDeployed` if the target contract is missing
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Submit `call` and block until it is confirmed.
    async fn submit(&self, call: &ContractCall) -> Result<TxReceipt>;

    /// Short name for logs.
    fn submitter_name(&self) -> &'static str;
}
