//! Coordinator error taxonomy.

use std::time::Duration;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors returned by batching, submission and confirmation waits.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// A gateway call failed. Propagated unchanged.
    #[error(transparent)]
    Transport(#[from] GatewayError),

    /// The deadline elapsed while the transaction was still pending.
    #[error(
        "waited {} seconds and transaction {transaction_id} is still pending",
        .timeout.as_secs_f64()
    )]
    Timeout {
        transaction_id: String,
        timeout: Duration,
    },

    /// An operation was rejected before any network interaction.
    #[error("invalid operation: {0}")]
    Validation(String),

    /// The wait was cancelled through its [`CancelToken`](crate::transactions::CancelToken).
    #[error("wait for transaction {transaction_id} was cancelled")]
    Cancelled { transaction_id: String },
}

impl CoordinatorError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoordinatorError::Timeout { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CoordinatorError::Transport(_))
    }
}

/// Result type for coordinator operations.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
