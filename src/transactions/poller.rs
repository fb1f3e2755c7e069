//! Confirmation polling.
//!
//! # States
//! ```text
//! Waiting ──status no longer pending──▶ Settled   (Ok(record))
//!    │
//!    ├──────deadline elapsed──────────▶ TimedOut  (Err(Timeout))
//!    │
//!    └──────cancel token triggered────▶ Cancelled (Err(Cancelled))
//! ```
//!
//! The cadence ticker and the deadline are both owned by the wait future, so
//! whichever exit is taken, dropping that future releases both timers and no
//! further query is issued.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tokio::time::{interval_at, timeout_at, Instant, MissedTickBehavior};

use crate::config::PollingConfig;
use crate::gateway::{Gateway, TransactionRecord};
use crate::observability::metrics;
use crate::transactions::cancel::{CancelSignal, CancelToken};
use crate::transactions::error::{CoordinatorError, CoordinatorResult};

/// Progress callback invoked for every poll that found the transaction still pending.
///
/// Receives the fresh record and the 1-based attempt number.
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(&TransactionRecord, u32) + Send);

/// A polled record, tagged by whether the backend has settled it.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Pending(TransactionRecord),
    Terminal(TransactionRecord),
}

impl From<TransactionRecord> for Settlement {
    fn from(record: TransactionRecord) -> Self {
        if record.status.is_pending() {
            Settlement::Pending(record)
        } else {
            Settlement::Terminal(record)
        }
    }
}

/// Waits for submitted transactions to leave the pending state.
#[derive(Debug, Clone)]
pub struct ConfirmationPoller<G> {
    gateway: G,
    interval: Duration,
    retry_transient_errors: bool,
    log_progress: bool,
}

impl<G: Gateway> ConfirmationPoller<G> {
    /// Create a poller with cadence and error policy from `config`.
    pub fn new(gateway: G, config: &PollingConfig) -> Self {
        Self {
            gateway,
            interval: Duration::from_millis(config.interval_ms),
            retry_transient_errors: config.retry_transient_errors,
            log_progress: config.log_progress,
        }
    }

    /// Delay between status queries.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until `transaction_id` settles or `timeout` elapses.
    ///
    /// Resolves with the terminal record whether the backend reports success
    /// or failure.
    pub async fn wait(&self, transaction_id: &str, timeout: Duration) -> CoordinatorResult<TransactionRecord> {
        self.run(transaction_id, timeout, None, None).await
    }

    /// [`wait`](Self::wait), reporting each still-pending poll to `on_progress`.
    ///
    /// A panicking callback is logged and otherwise ignored.
    pub async fn wait_with_progress<F>(
        &self,
        transaction_id: &str,
        timeout: Duration,
        mut on_progress: F,
    ) -> CoordinatorResult<TransactionRecord>
    where
        F: FnMut(&TransactionRecord, u32) + Send,
    {
        self.run(transaction_id, timeout, Some(&mut on_progress), None).await
    }

    /// [`wait`](Self::wait), abandoned with [`CoordinatorError::Cancelled`]
    /// when `cancel` is triggered.
    pub async fn wait_with_cancel(
        &self,
        transaction_id: &str,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> CoordinatorResult<TransactionRecord> {
        self.run(transaction_id, timeout, None, Some(cancel.subscribe())).await
    }

    async fn run(
        &self,
        transaction_id: &str,
        timeout: Duration,
        on_progress: Option<ProgressCallback<'_>>,
        cancel: Option<CancelSignal>,
    ) -> CoordinatorResult<TransactionRecord> {
        let started = Instant::now();
        let deadline = started + timeout;

        tracing::debug!(
            transaction_id = transaction_id,
            timeout_ms = timeout.as_millis() as u64,
            interval_ms = self.interval.as_millis() as u64,
            "Waiting for transaction to settle"
        );

        let polling = timeout_at(deadline, self.poll_until_settled(transaction_id, on_progress));

        let outcome = match cancel {
            Some(mut signal) => {
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => None,
                    res = polling => Some(res),
                }
            }
            None => Some(polling.await),
        };

        let elapsed = started.elapsed();
        match outcome {
            Some(Ok(Ok(record))) => {
                metrics::record_wait_outcome("settled", elapsed);
                tracing::info!(
                    transaction_id = transaction_id,
                    status = %record.status,
                    transaction_hash = record.transaction_hash.as_deref().unwrap_or(""),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Transaction settled"
                );
                Ok(record)
            }
            Some(Ok(Err(e))) => {
                metrics::record_wait_outcome("error", elapsed);
                tracing::warn!(transaction_id = transaction_id, error = %e, "Transaction wait failed");
                Err(e)
            }
            Some(Err(_)) => {
                metrics::record_wait_outcome("timeout", elapsed);
                tracing::warn!(
                    transaction_id = transaction_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Transaction still pending at deadline"
                );
                Err(CoordinatorError::Timeout {
                    transaction_id: transaction_id.to_string(),
                    timeout,
                })
            }
            None => {
                metrics::record_wait_outcome("cancelled", elapsed);
                tracing::info!(transaction_id = transaction_id, "Transaction wait cancelled");
                Err(CoordinatorError::Cancelled {
                    transaction_id: transaction_id.to_string(),
                })
            }
        }
    }

    async fn poll_until_settled(
        &self,
        transaction_id: &str,
        mut on_progress: Option<ProgressCallback<'_>>,
    ) -> CoordinatorResult<TransactionRecord> {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        // A slow query pushes the next one back instead of bunching ticks.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempt: u32 = 0;

        loop {
            ticker.tick().await;
            attempt += 1;
            metrics::record_poll_attempt();

            let record = match self.gateway.get_transaction(transaction_id).await {
                Ok(record) => record,
                Err(e) if self.retry_transient_errors => {
                    tracing::warn!(
                        transaction_id = transaction_id,
                        attempt = attempt,
                        error = %e,
                        "Status read failed, treating as pending"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match Settlement::from(record) {
                Settlement::Terminal(record) => return Ok(record),
                Settlement::Pending(record) => {
                    if self.log_progress {
                        tracing::info!(
                            transaction_id = transaction_id,
                            status = %record.status,
                            attempt = attempt,
                            retry_in_secs = self.interval.as_secs_f64(),
                            "Transaction still pending"
                        );
                    }
                    if let Some(callback) = on_progress.as_deref_mut() {
                        if catch_unwind(AssertUnwindSafe(|| callback(&record, attempt))).is_err() {
                            tracing::warn!(
                                transaction_id = transaction_id,
                                attempt = attempt,
                                "Progress callback panicked"
                            );
                        }
                    }
                }
            }
        }
    }
}
