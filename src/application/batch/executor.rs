//! Batch-with-fallback executor.
//!
//! A batched ledger transition reverts as a whole when any single id is
//! invalid, e.g. a user canceled a pending position between our read and our
//! write. The executor tries the batch once and, if it fails, degrades to one
//! transaction per id so a single bad position cannot block its batch-mates.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::{debug, error, info, warn};

use crate::domain::{BatchOutcome, ContractCall, PositionId, Transition};
use crate::error::{Error, KeeperError, Result};
use crate::port::TransactionSubmitter;

/// A batched write and its single-id counterpart.
pub trait BatchOperation: Send + Sync {
    /// Short name for logs.
    fn label(&self) -> &'static str;

    /// Call covering every id at once.
    fn batch_call(&self, ids: &[PositionId]) -> ContractCall;

    /// Call covering one id, used during fallback.
    fn single_call(&self, id: PositionId) -> ContractCall;
}

/// A ledger transition for one market's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOp {
    transition: Transition,
    collection: Address,
}

impl TransitionOp {
    /// Create an operation for `transition` on `collection`.
    #[must_use]
    pub const fn new(transition: Transition, collection: Address) -> Self {
        Self {
            transition,
            collection,
        }
    }
}

impl BatchOperation for TransitionOp {
    fn label(&self) -> &'static str {
        self.transition.batch_method()
    }

    fn batch_call(&self, ids: &[PositionId]) -> ContractCall {
        ContractCall::transition(self.transition, self.collection, ids.to_vec())
    }

    fn single_call(&self, id: PositionId) -> ContractCall {
        ContractCall::transition(self.transition, self.collection, vec![id])
    }
}

/// Runs a batch operation, falling back to per-id calls on failure.
#[derive(Clone)]
pub struct BatchExecutor {
    submitter: Arc<dyn TransactionSubmitter>,
}

impl BatchExecutor {
    /// Create an executor submitting through `submitter`.
    pub fn new(submitter: Arc<dyn TransactionSubmitter>) -> Self {
        Self { submitter }
    }

    /// Execute `op` over `ids`.
    ///
    /// An empty id set submits nothing. Otherwise one batch transaction is
    /// attempted; if it fails each id is submitted alone, in order, and
    /// per-id failures are recorded without stopping the loop. Nothing is
    /// retried beyond that single degradation.
    ///
    /// # Errors
    ///
    /// A missing collaborator is not a per-position problem: it is returned
    /// as soon as the batch reports it, before any fallback call.
    pub async fn execute(
        &self,
        ids: &[PositionId],
        op: &dyn BatchOperation,
    ) -> Result<BatchOutcome> {
        if ids.is_empty() {
            debug!(op = op.label(), "Nothing to submit");
            return Ok(BatchOutcome::skipped());
        }

        let batch_error = match self.submitter.submit(&op.batch_call(ids)).await {
            Ok(receipt) => {
                info!(
                    op = op.label(),
                    count = ids.len(),
                    gas_used = receipt.gas_used,
                    "Batch confirmed"
                );
                return Ok(BatchOutcome::batched(ids, receipt.gas_used));
            }
            Err(e @ Error::Keeper(KeeperError::CollaboratorNotDeployed { .. })) => return Err(e),
            Err(e) => e,
        };

        warn!(
            op = op.label(),
            count = ids.len(),
            error = %batch_error,
            "Batch failed, falling back to one transaction per position"
        );

        let mut outcome = BatchOutcome::fallback(ids.len());
        for &id in ids {
            match self.submitter.submit(&op.single_call(id)).await {
                Ok(receipt) => outcome.record_success(id, receipt.gas_used),
                Err(e) => {
                    error!(
                        op = op.label(),
                        position = %id,
                        error = %e,
                        "Position transition failed"
                    );
                    outcome.record_failure(id, e.to_string());
                }
            }
        }

        if outcome.has_failures() {
            error!(
                op = op.label(),
                failed = outcome.failed().len(),
                succeeded = outcome.succeeded().len(),
                "Positions left untransitioned after fallback"
            );
        } else {
            info!(op = op.label(), count = ids.len(), "Fallback completed");
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchMode, Collaborator, TxReceipt};
    use crate::error::ExecutionError;
    use alloy_primitives::B256;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Submitter that fails any call whose id set contains a poisoned id,
    /// and optionally every multi-id call.
    struct ScriptedSubmitter {
        poisoned: Vec<PositionId>,
        fail_batches: bool,
        calls: Mutex<Vec<ContractCall>>,
    }

    impl ScriptedSubmitter {
        fn new(poisoned: Vec<PositionId>, fail_batches: bool) -> Self {
            Self {
                poisoned,
                fail_batches,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TransactionSubmitter for ScriptedSubmitter {
        async fn submit(&self, call: &ContractCall) -> Result<TxReceipt> {
            self.calls.lock().push(call.clone());
            let ids = call.ids();
            if (self.fail_batches && ids.len() > 1) || ids.iter().any(|id| self.poisoned.contains(id)) {
                return Err(ExecutionError::TransactionReverted {
                    tx_hash: None,
                    reason: "scripted".into(),
                }
                .into());
            }
            Ok(TxReceipt {
                tx_hash: B256::ZERO,
                gas_used: 21_000,
                block_number: Some(1),
            })
        }

        fn submitter_name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Submitter for a chain without the ledger helper.
    #[derive(Default)]
    struct HelperMissing {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl TransactionSubmitter for HelperMissing {
        async fn submit(&self, _call: &ContractCall) -> Result<TxReceipt> {
            *self.calls.lock() += 1;
            Err(KeeperError::CollaboratorNotDeployed {
                collaborator: Collaborator::KeeperHelper,
            }
            .into())
        }

        fn submitter_name(&self) -> &'static str {
            "helper-missing"
        }
    }

    fn ids(raw: &[u64]) -> Vec<PositionId> {
        raw.iter().map(|&i| PositionId::from(i)).collect()
    }

    fn op() -> TransitionOp {
        TransitionOp::new(Transition::Activate, Address::repeat_byte(1))
    }

    #[tokio::test]
    async fn empty_set_submits_nothing() {
        let submitter = Arc::new(ScriptedSubmitter::new(vec![], false));
        let executor = BatchExecutor::new(submitter.clone());

        let outcome = executor.execute(&[], &op()).await.unwrap();

        assert_eq!(outcome.mode(), BatchMode::Skipped);
        assert_eq!(outcome.submitted(), 0);
        assert!(submitter.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn successful_batch_is_one_transaction() {
        let submitter = Arc::new(ScriptedSubmitter::new(vec![], false));
        let executor = BatchExecutor::new(submitter.clone());

        let outcome = executor.execute(&ids(&[1, 2, 3]), &op()).await.unwrap();

        assert_eq!(outcome.mode(), BatchMode::Batch);
        assert_eq!(outcome.succeeded().len(), 3);
        assert_eq!(outcome.gas_used(), 21_000);
        assert_eq!(submitter.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn poisoned_id_is_isolated() {
        let submitter = Arc::new(ScriptedSubmitter::new(ids(&[2]), false));
        let executor = BatchExecutor::new(submitter.clone());

        let outcome = executor.execute(&ids(&[1, 2, 3]), &op()).await.unwrap();

        assert_eq!(outcome.mode(), BatchMode::Fallback);
        assert_eq!(outcome.submitted(), 3);
        assert_eq!(outcome.succeeded().iter().copied().collect::<Vec<_>>(), ids(&[1, 3]));
        assert_eq!(outcome.failed().keys().copied().collect::<Vec<_>>(), ids(&[2]));

        let calls = submitter.calls.lock();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].ids().len(), 3);
        for (call, expected) in calls[1..].iter().zip(ids(&[1, 2, 3])) {
            assert_eq!(call.ids(), &[expected]);
        }
    }

    #[tokio::test]
    async fn fallback_keeps_submitted_count_even_when_all_fail() {
        let submitter = Arc::new(ScriptedSubmitter::new(ids(&[1, 2]), true));
        let executor = BatchExecutor::new(submitter);

        let outcome = executor.execute(&ids(&[1, 2]), &op()).await.unwrap();

        assert_eq!(outcome.submitted(), 2);
        assert!(outcome.succeeded().is_empty());
        assert_eq!(outcome.failed().len(), 2);
        assert!(outcome.failed().values().all(|r| r.contains("scripted")));
    }

    #[tokio::test]
    async fn missing_helper_is_returned_without_fallback() {
        let submitter = Arc::new(HelperMissing::default());
        let executor = BatchExecutor::new(submitter.clone());

        let err = executor.execute(&ids(&[1, 2, 3]), &op()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Keeper(KeeperError::CollaboratorNotDeployed {
                collaborator: Collaborator::KeeperHelper
            })
        ));
        assert_eq!(*submitter.calls.lock(), 1);
    }

    #[test]
    fn transition_op_builds_matching_calls() {
        let op = TransitionOp::new(Transition::Close, Address::repeat_byte(9));
        assert_eq!(op.label(), "batchCloseOptions");
        assert_eq!(
            op.single_call(PositionId::from(5)),
            ContractCall::transition(Transition::Close, Address::repeat_byte(9), ids(&[5]))
        );
    }
}
