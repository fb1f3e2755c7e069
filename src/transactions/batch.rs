//! Pending operation queue.
//!
//! An [`OperationBatch`] is a plain value owned by the caller. It is passed by
//! `&mut` into the submitter, so appends and the drain that follows a
//! successful submission can never interleave with another producer.

use serde::{Deserialize, Serialize};

use crate::transactions::error::{CoordinatorError, CoordinatorResult};

/// One contract call queued for batched execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Function name with parameter types, e.g. `mint(uint256)`.
    pub function_signature: String,
    /// Argument values, in declaration order.
    pub arguments_values: Vec<String>,
    /// Native token amount sent along with the call.
    #[serde(default)]
    pub message_value: u64,
}

impl Operation {
    /// Build an operation, rejecting an empty function signature.
    pub fn new<S, I, A>(
        function_signature: S,
        arguments_values: I,
        message_value: u64,
    ) -> CoordinatorResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let function_signature = function_signature.into();
        if function_signature.trim().is_empty() {
            return Err(CoordinatorError::Validation(
                "function signature must not be empty".to_string(),
            ));
        }

        Ok(Self {
            function_signature,
            arguments_values: arguments_values.into_iter().map(Into::into).collect(),
            message_value,
        })
    }
}

/// Ordered, append-only set of operations awaiting submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationBatch {
    operations: Vec<Operation>,
}

impl OperationBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation to the end of the batch.
    ///
    /// Fails with [`CoordinatorError::Validation`] on an empty signature, in
    /// which case the batch is left as it was. The signature is not checked
    /// against any contract ABI.
    pub fn append<S, I, A>(
        &mut self,
        function_signature: S,
        arguments_values: I,
        message_value: u64,
    ) -> CoordinatorResult<()>
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let operation = Operation::new(function_signature, arguments_values, message_value)?;
        self.push(operation);
        Ok(())
    }

    /// Append an already validated operation.
    pub fn push(&mut self, operation: Operation) {
        tracing::trace!(
            function_signature = %operation.function_signature,
            position = self.operations.len(),
            "Operation queued"
        );
        self.operations.push(operation);
    }

    /// Builder form of [`append`](Self::append) with a zero message value.
    pub fn with_operation<S, I, A>(mut self, function_signature: S, arguments_values: I) -> CoordinatorResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.append(function_signature, arguments_values, 0)?;
        Ok(self)
    }

    /// Take every queued operation, leaving the batch empty.
    pub fn drain_all(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations)
    }

    /// Queued operations, in append order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
