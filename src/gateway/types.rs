//! Custody API record types.
//!
//! Records are decoded once at the gateway boundary. Required fields are
//! plain values; anything the backend may omit or send as `null` is an
//! `Option`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::transactions::batch::Operation;

/// Lifecycle status of a transaction record.
///
/// `created` and `pending` both mean the backend has not settled the
/// transaction yet. Every other value is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Created,
    Pending,
    Success,
    Failed,
    /// Any backend-defined status this client does not name.
    Other(String),
}

impl TransactionStatus {
    /// Status string as the custody backend spells it.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Created => "created",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Other(raw) => raw,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Created | TransactionStatus::Pending)
    }
}

impl From<String> for TransactionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "created" => TransactionStatus::Created,
            "pending" => TransactionStatus::Pending,
            "success" => TransactionStatus::Success,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Other(raw),
        }
    }
}

impl From<&str> for TransactionStatus {
    fn from(raw: &str) -> Self {
        TransactionStatus::from(raw.to_string())
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction-specific details attached by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionMetadata {
    /// Operations of a custom transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_number: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ids: Option<Vec<serde_json::Value>>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The backend's view of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub status: TransactionStatus,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default, alias = "blockscanUrl", alias = "scanUrl")]
    pub block_explorer_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: TransactionMetadata,
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TransactionRecord {
    /// A freshly created record with only the required fields set.
    pub fn new(id: impl Into<String>, status: impl Into<TransactionStatus>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            kind: None,
            contract_id: None,
            transaction_hash: None,
            block_explorer_url: None,
            created_at: String::new(),
            updated_at: String::new(),
            completed_at: None,
            metadata: TransactionMetadata::default(),
        }
    }

    pub fn with_transaction_hash(mut self, hash: impl Into<String>) -> Self {
        self.transaction_hash = Some(hash.into());
        self
    }
}

/// Body of `POST transactions/custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTransactionRequest {
    pub wallet_id: String,
    pub contract_address: String,
    pub operations: Vec<Operation>,
}

/// What a transfer moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransferAsset {
    #[serde(rename_all = "camelCase")]
    Nft { token_id: String },
    Fungible { quantity: u64 },
}

/// Body of `POST transactions/transfers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Sender wallet id.
    pub from: String,
    /// Recipient wallet id.
    pub to: String,
    pub contract_id: String,
    #[serde(flatten)]
    pub asset: TransferAsset,
}

/// Chains a project can be created on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chain {
    #[default]
    Ethereum,
    Chiliz,
    Polygon,
}

impl std::str::FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" => Ok(Chain::Ethereum),
            "chiliz" => Ok(Chain::Chiliz),
            "polygon" => Ok(Chain::Polygon),
            other => Err(format!("unsupported chain '{}'", other)),
        }
    }
}

/// Body of `POST projects/auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub blockchain_name: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBlockchain {
    pub name: String,
    pub decimal_chain_id: u64,
}

/// A project created on the custody backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub blockchain: ProjectBlockchain,
    pub created_at: String,
    pub updated_at: String,
    pub api_key: String,
}

/// A token held by a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub contract_id: String,
    #[serde(default)]
    pub uri_number: Option<u64>,
    pub blockchain_name: String,
    pub contract_address: String,
    pub contract_type: String,
    pub name: String,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub quantity: u64,
}

/// A custodial wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub address: String,
    pub project_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
}
