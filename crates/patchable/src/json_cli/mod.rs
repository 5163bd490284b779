//! Core logic of the `json-patch` command-line tool.

use serde_json::Value;
use thiserror::Error;

use crate::json_patch::{patch, FailureReason};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{reason}: {message}")]
    Patch {
        reason: FailureReason,
        message: String,
    },
}

/// Apply a JSON Patch (RFC 6902) to a document.
///
/// `doc_json`: the document as a JSON string.
/// `patch_json`: the patch operations as a JSON array string.
///
/// Returns the patched document as a pretty-printed JSON string. A failing
/// operation fails the whole command; nothing is printed for partially
/// patched documents.
pub fn apply_json_patch(doc_json: &str, patch_json: &str) -> Result<String, CliError> {
    let mut doc: Value = serde_json::from_str(doc_json)?;
    let result = patch(patch_json, &mut doc);
    if let Some(reason) = result.failure_reason {
        return Err(CliError::Patch {
            reason,
            message: result.message.unwrap_or_default(),
        });
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}
