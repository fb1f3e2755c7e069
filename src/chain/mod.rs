//! Read-only chain bridge.
//!
//! # Data Flow
//! ```text
//! ChainConfig (RPC URL + failovers)
//!     → client.rs (RPC connection with timeouts)
//!     → contract.rs (encode call from signature, eth_call, decode outputs)
//!     → events.rs (poll logs for one event, deliver over mpsc)
//! ```
//!
//! # Constraints
//! - Never signs or sends transactions; writes go through the custody API
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod events;
pub mod types;

pub use client::ChainClient;
pub use contract::{read, ContractFunction, ReadResult};
pub use events::{ChainEvent, EventListener};
pub use types::{ChainError, ChainResult};
