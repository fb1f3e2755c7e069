//! Custody backend boundary.
//!
//! # Data Flow
//! ```text
//! TransactionSubmitter ──create_transaction──┐
//!                                            ├──▶ Gateway ──▶ custody API
//! ConfirmationPoller ────get_transaction─────┘       (bearer auth, JSON)
//! ```
//!
//! The coordinator only depends on the [`Gateway`] trait. [`HttpGateway`] is
//! the production implementation; tests substitute scripted fakes.

pub mod error;
pub mod http;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;
pub use types::{
    Chain, CustomTransactionRequest, Project, TransactionRecord, TransactionStatus,
    TransferAsset, TransferRequest, Wallet,
};

/// Authenticated request/response exchange with the custody backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Submit a batched custom transaction.
    async fn create_transaction(
        &self,
        request: &CustomTransactionRequest,
    ) -> GatewayResult<TransactionRecord>;

    /// Read the current record of a transaction.
    async fn get_transaction(&self, transaction_id: &str) -> GatewayResult<TransactionRecord>;

    /// Move an NFT or a fungible token amount between wallets.
    async fn transfer_asset(&self, request: &TransferRequest) -> GatewayResult<TransactionRecord>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn create_transaction(
        &self,
        request: &CustomTransactionRequest,
    ) -> GatewayResult<TransactionRecord> {
        (**self).create_transaction(request).await
    }

    async fn get_transaction(&self, transaction_id: &str) -> GatewayResult<TransactionRecord> {
        (**self).get_transaction(transaction_id).await
    }

    async fn transfer_asset(&self, request: &TransferRequest) -> GatewayResult<TransactionRecord> {
        (**self).transfer_asset(request).await
    }
}
