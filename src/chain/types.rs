//! Chain bridge error definitions.

use thiserror::Error;

/// Errors that can occur during contract reads and event listening.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed on every provider.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Function or event signature could not be parsed.
    #[error("invalid signature '{signature}': {reason}")]
    Signature { signature: String, reason: String },

    /// An argument could not be coerced to its ABI type.
    #[error("invalid argument #{index} for type {ty}: {reason}")]
    Argument {
        index: usize,
        ty: String,
        reason: String,
    },

    /// Wrong number of arguments for the function.
    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    /// Return data or log data did not match the declared types.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Invalid contract address.
    #[error("invalid address '{0}'")]
    Address(String),

    /// Chain access disabled in configuration.
    #[error("chain access not available: {0}")]
    NotAvailable(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
