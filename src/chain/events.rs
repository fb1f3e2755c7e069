//! Contract event listening.

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::Event;
use alloy::primitives::Address;
use alloy::rpc::types::{Filter, Log};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::chain::client::ChainClient;
use crate::chain::contract::value_to_json;
use crate::chain::types::{ChainError, ChainResult};
use crate::transactions::CancelSignal;

/// A decoded contract event.
#[derive(Debug, Clone)]
pub struct ChainEvent {
    pub block_number: u64,
    pub transaction_hash: Option<String>,
    pub indexed: Vec<DynSolValue>,
    pub body: Vec<DynSolValue>,
}

impl ChainEvent {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "blockNumber": self.block_number,
            "transactionHash": self.transaction_hash,
            "indexed": self.indexed.iter().map(value_to_json).collect::<Vec<_>>(),
            "body": self.body.iter().map(value_to_json).collect::<Vec<_>>(),
        })
    }
}

/// Polls a contract's logs for one event and forwards each occurrence.
pub struct EventListener {
    client: ChainClient,
    contract: Address,
    event: Event,
    poll_interval: Duration,
    /// Last block whose logs were delivered; `None` until the start block is known.
    last_block: Option<u64>,
}

impl EventListener {
    /// Create a listener for `event_signature` emitted by `contract`.
    ///
    /// The signature may be canonical (`Transfer(address,address,uint256)`)
    /// or full (`event Transfer(address indexed from, address indexed to, uint256 value)`).
    /// Only the full form marks indexed parameters.
    pub fn new(client: ChainClient, contract: &str, event_signature: &str) -> ChainResult<Self> {
        let contract: Address = contract
            .parse()
            .map_err(|_| ChainError::Address(contract.to_string()))?;
        let event = Event::parse(event_signature).map_err(|e| ChainError::Signature {
            signature: event_signature.to_string(),
            reason: e.to_string(),
        })?;
        let poll_interval = Duration::from_millis(client.config().event_poll_interval_ms);

        Ok(Self {
            client,
            contract,
            event,
            poll_interval,
            last_block: None,
        })
    }

    /// Run until `shutdown` fires or the receiving side of `events` is dropped.
    ///
    /// Only events mined after the listener starts are delivered.
    pub async fn run(mut self, events: mpsc::Sender<ChainEvent>, mut shutdown: CancelSignal) {
        tracing::info!(
            contract = %self.contract,
            event = %self.event.signature(),
            "Starting event listener"
        );

        if let Ok(block) = self.client.get_block_number().await {
            self.next_range(block);
        }

        let mut ticker = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_events(&events).await {
                        Ok(true) => {}
                        Ok(false) => {
                            tracing::info!("Event receiver dropped, stopping listener");
                            break;
                        }
                        Err(e) => tracing::error!(error = %e, "Error polling contract events"),
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("Event listener received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Returns `Ok(false)` once the receiver is gone.
    async fn poll_events(&mut self, events: &mpsc::Sender<ChainEvent>) -> ChainResult<bool> {
        let current_block = self.client.get_block_number().await?;
        let Some((from_block, to_block)) = self.next_range(current_block) else {
            return Ok(true);
        };

        let filter = Filter::new()
            .address(self.contract)
            .from_block(from_block)
            .to_block(to_block)
            .event_signature(self.event.selector());

        let logs = self.client.get_logs(&filter).await?;

        for log in logs {
            let Some(event) = self.decode(&log) else {
                continue;
            };
            if events.send(event).await.is_err() {
                return Ok(false);
            }
        }

        self.last_block = Some(to_block);
        Ok(true)
    }

    /// Block range to fetch given the chain head.
    ///
    /// The first head seen becomes the start block and yields no range, so
    /// history mined before the listener started is never requested.
    fn next_range(&mut self, current_block: u64) -> Option<(u64, u64)> {
        match self.last_block {
            None => {
                self.last_block = Some(current_block);
                tracing::info!(block = current_block, "Event listener starting at block");
                None
            }
            Some(last) if current_block > last => Some((last + 1, current_block)),
            Some(_) => None,
        }
    }

    fn decode(&self, log: &Log) -> Option<ChainEvent> {
        match self.event.decode_log(log.data()) {
            Ok(decoded) => Some(ChainEvent {
                block_number: log.block_number.unwrap_or_default(),
                transaction_hash: log.transaction_hash.map(|h| h.to_string()),
                indexed: decoded.indexed,
                body: decoded.body,
            }),
            Err(e) => {
                tracing::warn!(
                    transaction_hash = ?log.transaction_hash,
                    error = %e,
                    "Skipping undecodable log"
                );
                None
            }
        }
    }
}
