//! Read-only contract calls from human-readable signatures.

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::Function;
use alloy::primitives::{hex, Address, Bytes};

use crate::chain::client::ChainClient;
use crate::chain::types::{ChainError, ChainResult};

/// A parsed contract function, ready to encode calls and decode results.
#[derive(Debug, Clone)]
pub struct ContractFunction {
    function: Function,
}

impl ContractFunction {
    /// Parse a signature such as `balanceOf(address)` or
    /// `function balanceOf(address owner) view returns (uint256)`.
    ///
    /// Without a `returns` clause the call result is not decoded.
    pub fn parse(signature: &str) -> ChainResult<Self> {
        let function = Function::parse(signature).map_err(|e| ChainError::Signature {
            signature: signature.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { function })
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// 4-byte selector.
    pub fn selector(&self) -> [u8; 4] {
        self.function.selector().0
    }

    /// Coerce string arguments to the declared input types and ABI-encode them.
    pub fn encode_call(&self, args: &[String]) -> ChainResult<Bytes> {
        let inputs = &self.function.inputs;
        if inputs.len() != args.len() {
            return Err(ChainError::ArgumentCount {
                expected: inputs.len(),
                actual: args.len(),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for (index, (param, arg)) in inputs.iter().zip(args).enumerate() {
            let ty = param.resolve().map_err(|e| ChainError::Argument {
                index,
                ty: param.ty.clone(),
                reason: e.to_string(),
            })?;
            let value = ty.coerce_str(arg).map_err(|e| ChainError::Argument {
                index,
                ty: param.ty.clone(),
                reason: e.to_string(),
            })?;
            values.push(value);
        }

        let encoded = self
            .function
            .abi_encode_input(&values)
            .map_err(|e| ChainError::Decode(e.to_string()))?;
        Ok(Bytes::from(encoded))
    }

    /// Decode return data according to the declared outputs.
    pub fn decode_output(&self, data: &[u8]) -> ChainResult<Vec<DynSolValue>> {
        if self.function.outputs.is_empty() {
            return Ok(Vec::new());
        }
        self.function
            .abi_decode_output(data)
            .map_err(|e| ChainError::Decode(e.to_string()))
    }
}

/// Result of a contract read.
#[derive(Debug, Clone)]
pub struct ReadResult {
    /// Raw return data.
    pub raw: Bytes,
    /// Decoded outputs; empty when the signature declared none.
    pub values: Vec<DynSolValue>,
}

impl ReadResult {
    /// Outputs rendered as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "raw": hex::encode_prefixed(&self.raw),
            "values": self.values.iter().map(value_to_json).collect::<Vec<_>>(),
        })
    }
}

/// Call a view function on `contract`.
pub async fn read(
    client: &ChainClient,
    contract: &str,
    signature: &str,
    args: &[String],
) -> ChainResult<ReadResult> {
    let address: Address = contract
        .parse()
        .map_err(|_| ChainError::Address(contract.to_string()))?;
    let function = ContractFunction::parse(signature)?;
    let input = function.encode_call(args)?;

    tracing::debug!(
        contract = %address,
        function = function.name(),
        "Contract read"
    );

    let raw = client.call(address, input).await?;
    let values = function.decode_output(&raw)?;
    Ok(ReadResult { raw, values })
}

/// Render an ABI value as JSON. Integers become decimal strings.
pub fn value_to_json(value: &DynSolValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::FixedBytes(word, size) => Value::String(hex::encode_prefixed(&word[..*size])),
        DynSolValue::Address(a) => Value::String(a.to_checksum(None)),
        DynSolValue::Bytes(b) => Value::String(hex::encode_prefixed(b)),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(value_to_json).collect())
        }
        other => Value::String(format!("{:?}", other)),
    }
}
