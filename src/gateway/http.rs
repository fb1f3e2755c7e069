//! HTTP gateway to the custody API.
//!
//! # Responsibilities
//! - Attach bearer credentials and a per-request correlation id
//! - Enforce the configured request timeout
//! - Decode JSON responses into typed records
//! - Forward the project/wallet/transfer calls that carry no coordinator state

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::types::{
    Chain, CreateProjectRequest, CustomTransactionRequest, Project, TransactionRecord,
    TransferAsset, TransferRequest, Wallet,
};
use crate::gateway::Gateway;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Custody API client over HTTPS.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    bearer_token: String,
}

impl HttpGateway {
    /// Create a gateway from API settings.
    ///
    /// The base URL is treated as a directory, so `https://host/v2` and
    /// `https://host/v2/` resolve paths identically.
    pub fn new(config: &ApiConfig) -> GatewayResult<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::info!(base_url = %base_url, "Custody gateway initialized");

        Ok(Self {
            client,
            base_url,
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Base URL every request path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> GatewayResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;
        let request_id = uuid::Uuid::new_v4();

        tracing::debug!(
            method = %method,
            path = path,
            request_id = %request_id,
            "Custody API request"
        );

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.bearer_token)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(
                method = %method,
                path = path,
                request_id = %request_id,
                status = status.as_u16(),
                "Custody API returned error status"
            );
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T, B>(&self, path: &str, body: Option<&B>) -> GatewayResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, body).await
    }

    /// Create a project on the given chain.
    pub async fn create_project(&self, name: &str, chain: Chain) -> GatewayResult<Project> {
        let body = CreateProjectRequest {
            name: name.to_string(),
            blockchain_name: chain,
        };
        self.post("projects/auth", Some(&body)).await
    }

    /// Create a new custodial wallet.
    pub async fn create_wallet(&self) -> GatewayResult<Wallet> {
        self.post::<Wallet, ()>("wallets", None).await
    }

    /// Read a wallet together with its tokens.
    pub async fn read_wallet(&self, wallet_id: &str) -> GatewayResult<Wallet> {
        self.get(&format!("wallets/{}", wallet_id)).await
    }

    pub async fn list_wallets(&self) -> GatewayResult<Vec<Wallet>> {
        self.get("wallets").await
    }

    /// Every transaction made in the project.
    pub async fn list_transactions(&self) -> GatewayResult<Vec<TransactionRecord>> {
        self.get("transactions").await
    }

    pub async fn transfer_nft(
        &self,
        contract_id: &str,
        from: &str,
        to: &str,
        token_id: &str,
    ) -> GatewayResult<TransactionRecord> {
        let request = TransferRequest {
            from: from.to_string(),
            to: to.to_string(),
            contract_id: contract_id.to_string(),
            asset: TransferAsset::Nft {
                token_id: token_id.to_string(),
            },
        };
        self.transfer_asset(&request).await
    }

    pub async fn transfer_tokens(
        &self,
        contract_id: &str,
        from: &str,
        to: &str,
        quantity: u64,
    ) -> GatewayResult<TransactionRecord> {
        let request = TransferRequest {
            from: from.to_string(),
            to: to.to_string(),
            contract_id: contract_id.to_string(),
            asset: TransferAsset::Fungible { quantity },
        };
        self.transfer_asset(&request).await
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn create_transaction(
        &self,
        request: &CustomTransactionRequest,
    ) -> GatewayResult<TransactionRecord> {
        self.post("transactions/custom", Some(request)).await
    }

    async fn get_transaction(&self, transaction_id: &str) -> GatewayResult<TransactionRecord> {
        self.get(&format!("transactions/{}", transaction_id)).await
    }

    async fn transfer_asset(&self, request: &TransferRequest) -> GatewayResult<TransactionRecord> {
        self.post("transactions/transfers", Some(request)).await
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}
