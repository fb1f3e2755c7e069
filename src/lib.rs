//! Custody transaction client library.
//!
//! Queue contract calls into an [`OperationBatch`], submit them through a
//! custody [`Gateway`], and wait for the resulting transaction to settle.
//!
//! ```text
//! OperationBatch ──submit──▶ Gateway (custody API) ──wait──▶ TransactionRecord
//! ```

pub mod chain;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod transactions;

pub use config::ClientConfig;
pub use gateway::{Gateway, GatewayError, HttpGateway, TransactionRecord, TransactionStatus};
pub use transactions::{
    CancelToken, ConfirmationPoller, Coordinator, CoordinatorError, Operation, OperationBatch,
    TransactionSubmitter,
};
