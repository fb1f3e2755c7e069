//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;

use custody_client::config::PollingConfig;
use custody_client::gateway::types::CustomTransactionRequest;
use custody_client::gateway::{Gateway, GatewayError, GatewayResult, TransferRequest};
use custody_client::TransactionRecord;

/// One scripted gateway answer.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A record with this id's status set to the given value.
    Status(&'static str),
    /// A fully specified record.
    Record(TransactionRecord),
    /// A transport failure.
    Fail(&'static str),
}

impl Reply {
    fn into_result(self, transaction_id: &str) -> GatewayResult<TransactionRecord> {
        match self {
            Reply::Status(status) => Ok(TransactionRecord::new(transaction_id, status)),
            Reply::Record(record) => Ok(record),
            Reply::Fail(reason) => Err(GatewayError::Unavailable(reason.to_string())),
        }
    }
}

/// In-memory gateway answering from a script and recording every call.
pub struct ScriptedGateway {
    transaction_id: String,
    created_at: Instant,
    submit_replies: Mutex<VecDeque<Reply>>,
    poll_replies: Mutex<VecDeque<Reply>>,
    poll_fallback: Reply,
    submissions: Mutex<Vec<CustomTransactionRequest>>,
    polls: Mutex<Vec<(String, Duration)>>,
}

impl ScriptedGateway {
    /// A gateway for `transaction_id` that accepts submissions and keeps
    /// answering "created" once its poll script runs out.
    pub fn new(transaction_id: &str) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            created_at: Instant::now(),
            submit_replies: Mutex::new(VecDeque::new()),
            poll_replies: Mutex::new(VecDeque::new()),
            poll_fallback: Reply::Status("created"),
            submissions: Mutex::new(Vec::new()),
            polls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_submit(self, reply: Reply) -> Self {
        self.submit_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_poll(self, reply: Reply) -> Self {
        self.poll_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn submissions(&self) -> Vec<CustomTransactionRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    /// Offsets of each poll from gateway creation.
    pub fn poll_offsets(&self) -> Vec<Duration> {
        self.polls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    /// Transaction ids that were polled, in order.
    pub fn polled_ids(&self) -> Vec<String> {
        self.polls.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn create_transaction(
        &self,
        request: &CustomTransactionRequest,
    ) -> GatewayResult<TransactionRecord> {
        self.submissions.lock().unwrap().push(request.clone());
        let reply = self
            .submit_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Status("created"));
        reply.into_result(&self.transaction_id)
    }

    async fn get_transaction(&self, transaction_id: &str) -> GatewayResult<TransactionRecord> {
        self.polls
            .lock()
            .unwrap()
            .push((transaction_id.to_string(), self.created_at.elapsed()));
        let reply = self
            .poll_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.poll_fallback.clone());
        reply.into_result(transaction_id)
    }

    async fn transfer_asset(&self, _request: &TransferRequest) -> GatewayResult<TransactionRecord> {
        Reply::Status("created").into_result(&self.transaction_id)
    }
}

/// Polling settings with the default cadence and quiet progress logs.
pub fn polling_config() -> PollingConfig {
    PollingConfig {
        log_progress: false,
        ..PollingConfig::default()
    }
}

/// A request captured by the mock HTTP backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Start a programmable mock custody API on an ephemeral port.
///
/// Returns its address and the log of requests received.
pub async fn start_programmable_backend<F>(handler: F) -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>)
where
    F: Fn(&CapturedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let log = captured.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = handler(&request);
                        log.lock().unwrap().push(request);

                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..end]).to_string();

    Some(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// JSON for a transaction record as the custody API returns it.
pub fn record_json(id: &str, status: &str, hash: Option<&str>) -> String {
    serde_json::json!({
        "id": id,
        "type": "custom",
        "status": status,
        "transactionHash": hash,
        "blockscanUrl": hash.map(|h| format!("https://scan.example/tx/{}", h)),
        "createdAt": "2024-05-01T12:00:00.000Z",
        "updatedAt": "2024-05-01T12:00:01.000Z",
        "completedAt": null,
        "metadata": {}
    })
    .to_string()
}
