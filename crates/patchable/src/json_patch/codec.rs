//! JSON codec for JSON Patch operations.
//!
//! Wire format (RFC 6902): an array of `{ "op", "path", "from"?, "value"? }`
//! objects. A present `"value": null` is a value; an absent `value` is not.

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{OpKind, Operation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Syntax(String),
    #[error("patch document must be an array of operations")]
    NotAnArray,
    #[error("operation {index}: {reason}")]
    InvalidOperation { index: usize, reason: String },
}

fn string_member(obj: &Map<String, Value>, name: &str) -> Result<Option<String>, String> {
    match obj.get(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("'{name}' must be a string")),
    }
}

/// Decode one operation object.
pub fn decode_operation(value: &Value) -> Result<Operation, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "operation must be an object".to_string())?;
    let kind: OpKind = string_member(obj, "op")?
        .ok_or_else(|| "missing 'op'".to_string())?
        .parse()
        .map_err(|err: super::types::UnknownOpKind| err.to_string())?;
    let path = string_member(obj, "path")?.ok_or_else(|| "missing 'path'".to_string())?;
    let from = string_member(obj, "from")?;
    let value = obj.get("value").cloned();

    if kind.needs_from() && from.is_none() {
        return Err(format!("'{kind}' requires 'from'"));
    }
    if kind.needs_value() && value.is_none() {
        return Err(format!("'{kind}' requires 'value'"));
    }
    Ok(Operation {
        kind,
        path,
        from: from.filter(|_| kind.needs_from()),
        value: value.filter(|_| kind.needs_value()),
    })
}

/// Decode an already parsed patch document.
pub fn from_json_patch(doc: &Value) -> Result<Vec<Operation>, CodecError> {
    let items = doc.as_array().ok_or(CodecError::NotAnArray)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode_operation(item).map_err(|reason| CodecError::InvalidOperation { index, reason })
        })
        .collect()
}

/// Parse and decode patch text.
pub fn from_json(text: &str) -> Result<Vec<Operation>, CodecError> {
    let doc: Value = serde_json::from_str(text).map_err(|err| CodecError::Syntax(err.to_string()))?;
    from_json_patch(&doc)
}

/// Encode one operation in wire form.
pub fn to_json(operation: &Operation) -> Value {
    let mut m = Map::new();
    m.insert("op".into(), Value::String(operation.kind.as_str().to_string()));
    m.insert("path".into(), Value::String(operation.path.clone()));
    if let Some(from) = &operation.from {
        m.insert("from".into(), Value::String(from.clone()));
    }
    if let Some(value) = &operation.value {
        m.insert("value".into(), value.clone());
    }
    Value::Object(m)
}

/// Encode a list of operations as a patch document.
pub fn to_json_patch(operations: &[Operation]) -> Value {
    Value::Array(operations.iter().map(to_json).collect())
}
