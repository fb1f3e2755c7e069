//! Submit-then-confirm facade.

use std::time::Duration;

use crate::config::PollingConfig;
use crate::gateway::{Gateway, TransactionRecord};
use crate::transactions::batch::OperationBatch;
use crate::transactions::cancel::CancelToken;
use crate::transactions::error::CoordinatorResult;
use crate::transactions::poller::ConfirmationPoller;
use crate::transactions::submitter::TransactionSubmitter;

/// Drives a batch from submission to settlement against one gateway.
///
/// Holds no batch of its own; every call takes the caller's batch, so one
/// coordinator can serve any number of independent transactions.
#[derive(Debug, Clone)]
pub struct Coordinator<G> {
    submitter: TransactionSubmitter<G>,
    poller: ConfirmationPoller<G>,
    default_timeout: Duration,
}

impl<G: Gateway + Clone> Coordinator<G> {
    pub fn new(gateway: G, config: &PollingConfig) -> Self {
        Self {
            submitter: TransactionSubmitter::new(gateway.clone()),
            poller: ConfirmationPoller::new(gateway, config),
            default_timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl<G: Gateway> Coordinator<G> {
    /// Deadline used when a call passes `None`.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn submitter(&self) -> &TransactionSubmitter<G> {
        &self.submitter
    }

    pub fn poller(&self) -> &ConfirmationPoller<G> {
        &self.poller
    }

    /// See [`TransactionSubmitter::submit`].
    pub async fn submit(
        &self,
        batch: &mut OperationBatch,
        wallet_id: &str,
        contract_address: &str,
    ) -> CoordinatorResult<TransactionRecord> {
        self.submitter.submit(batch, wallet_id, contract_address).await
    }

    /// Submit the batch, then wait for the created transaction to settle.
    pub async fn submit_and_await(
        &self,
        batch: &mut OperationBatch,
        wallet_id: &str,
        contract_address: &str,
        timeout: Option<Duration>,
    ) -> CoordinatorResult<TransactionRecord> {
        tracing::info!(operations = batch.len(), "Executing custom transaction");

        let created = self.submitter.submit(batch, wallet_id, contract_address).await?;

        tracing::info!(transaction_id = %created.id, "Transaction created, awaiting confirmation");

        self.wait(&created.id, timeout).await
    }

    /// Wait for an already submitted transaction to settle.
    pub async fn wait(&self, transaction_id: &str, timeout: Option<Duration>) -> CoordinatorResult<TransactionRecord> {
        self.poller
            .wait(transaction_id, timeout.unwrap_or(self.default_timeout))
            .await
    }

    /// [`wait`](Self::wait) that gives up when `cancel` is triggered.
    pub async fn wait_with_cancel(
        &self,
        transaction_id: &str,
        timeout: Option<Duration>,
        cancel: &CancelToken,
    ) -> CoordinatorResult<TransactionRecord> {
        self.poller
            .wait_with_cancel(transaction_id, timeout.unwrap_or(self.default_timeout), cancel)
            .await
    }
}
