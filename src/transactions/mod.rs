//! Transaction lifecycle coordination.
//!
//! # Data Flow
//! ```text
//! OperationBatch::append (0..N)
//!     → TransactionSubmitter::submit (send current ops, drain on success)
//!     → ConfirmationPoller::wait (query every interval until settled or deadline)
//!     → caller receives the terminal TransactionRecord
//! ```
//!
//! # Design Decisions
//! - The batch is a caller-owned value; the coordinator keeps no queue
//! - A failed submission leaves the batch intact for a retry
//! - Only the pending marker is special; every other status is terminal
//! - No backoff: one query per interval, never overlapping

pub mod batch;
pub mod cancel;
pub mod coordinator;
pub mod error;
pub mod poller;
pub mod submitter;

pub use batch::{Operation, OperationBatch};
pub use cancel::{CancelSignal, CancelToken};
pub use coordinator::Coordinator;
pub use error::{CoordinatorError, CoordinatorResult};
pub use poller::{ConfirmationPoller, Settlement};
pub use submitter::TransactionSubmitter;
