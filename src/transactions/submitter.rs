//! Batch submission.

use crate::gateway::{CustomTransactionRequest, Gateway, TransactionRecord};
use crate::observability::metrics;
use crate::transactions::batch::OperationBatch;
use crate::transactions::error::CoordinatorResult;

/// Turns an [`OperationBatch`] into a custody transaction.
#[derive(Debug, Clone)]
pub struct TransactionSubmitter<G> {
    gateway: G,
}

impl<G: Gateway> TransactionSubmitter<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Send the batch's current operations to the backend.
    ///
    /// The batch is drained only after the backend accepted the request. On
    /// any gateway error it is left exactly as it was, so the same batch can
    /// be submitted again.
    pub async fn submit(
        &self,
        batch: &mut OperationBatch,
        wallet_id: &str,
        contract_address: &str,
    ) -> CoordinatorResult<TransactionRecord> {
        let operations = batch.len();
        if operations == 0 {
            tracing::warn!(wallet_id = wallet_id, "Submitting an empty operation batch");
        }

        let request = CustomTransactionRequest {
            wallet_id: wallet_id.to_string(),
            contract_address: contract_address.to_string(),
            operations: batch.operations().to_vec(),
        };

        tracing::info!(
            wallet_id = wallet_id,
            contract_address = contract_address,
            operations = operations,
            "Submitting custom transaction"
        );

        match self.gateway.create_transaction(&request).await {
            Ok(record) => {
                batch.drain_all();
                metrics::record_submission("accepted", operations);
                tracing::info!(
                    transaction_id = %record.id,
                    status = %record.status,
                    "Custom transaction created"
                );
                Ok(record)
            }
            Err(e) => {
                metrics::record_submission("rejected", operations);
                tracing::warn!(
                    wallet_id = wallet_id,
                    error = %e,
                    "Custom transaction submission failed, batch kept"
                );
                Err(e.into())
            }
        }
    }
}
