//! Core types for the JSON Patch module: operations, options and results.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

// ── Operation ─────────────────────────────────────────────────────────────

/// The six RFC 6902 operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        }
    }

    /// Whether the operation reads its source from `from`.
    pub fn needs_from(&self) -> bool {
        matches!(self, OpKind::Move | OpKind::Copy)
    }

    /// Whether the operation carries a `value`.
    pub fn needs_value(&self) -> bool {
        matches!(self, OpKind::Add | OpKind::Replace | OpKind::Test)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown operation '{0}'")]
pub struct UnknownOpKind(pub String);

impl FromStr for OpKind {
    type Err = UnknownOpKind;

    /// Case-sensitive, as on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(OpKind::Add),
            "remove" => Ok(OpKind::Remove),
            "replace" => Ok(OpKind::Replace),
            "move" => Ok(OpKind::Move),
            "copy" => Ok(OpKind::Copy),
            "test" => Ok(OpKind::Test),
            other => Err(UnknownOpKind(other.to_string())),
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single patch operation, as decoded from the wire.
///
/// `path` and `from` are unparsed pointer strings; they are resolved against
/// the target when the operation is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub path: String,
    pub from: Option<String>,
    pub value: Option<Value>,
}

impl Operation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(OpKind::Add, path, value)
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            kind: OpKind::Remove,
            path: path.into(),
            from: None,
            value: None,
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(OpKind::Replace, path, value)
    }

    pub fn move_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_from(OpKind::Move, from, path)
    }

    pub fn copy_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_from(OpKind::Copy, from, path)
    }

    pub fn test(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(OpKind::Test, path, value)
    }

    fn with_value(kind: OpKind, path: impl Into<String>, value: Value) -> Self {
        Self {
            kind,
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }

    fn with_from(kind: OpKind, from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// How pointer steps are matched against member names of keyed containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemberMatching {
    /// Steps must equal the member name.
    #[default]
    Exact,
    /// An exact match wins; otherwise the first member whose name equals the
    /// step ignoring case is used.
    CaseInsensitive,
}

/// Options for [`apply_with_options`](super::apply_with_options).
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    pub member_matching: MemberMatching,
}

// ── Result ────────────────────────────────────────────────────────────────

/// Why a patch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The wire text could not be decoded into operations.
    CouldNotParseJson,
    /// An operation's `path` could not be resolved.
    CouldNotParsePath,
    /// A move/copy operation's `from` could not be resolved.
    CouldNotParseFrom,
    /// The operation was resolved but could not be carried out.
    OperationFailed,
    /// A `test` operation did not hold.
    TestFailed,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::CouldNotParseJson => "CouldNotParseJson",
            FailureReason::CouldNotParsePath => "CouldNotParsePath",
            FailureReason::CouldNotParseFrom => "CouldNotParseFrom",
            FailureReason::OperationFailed => "OperationFailed",
            FailureReason::TestFailed => "TestFailed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of applying a patch.
///
/// Operations applied before a failure stay applied on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    pub succeeded: bool,
    pub failure_reason: Option<FailureReason>,
    pub message: Option<String>,
}

impl PatchResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            failure_reason: None,
            message: None,
        }
    }

    pub fn failure(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            failure_reason: Some(reason),
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for PatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.failure_reason, &self.message) {
            _ if self.succeeded => f.write_str("patch applied"),
            (Some(reason), Some(message)) => write!(f, "{reason}: {message}"),
            (Some(reason), None) => write!(f, "{reason}"),
            (None, _) => f.write_str("patch failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn op_kind_roundtrip_is_case_sensitive() {
        for kind in [
            OpKind::Add,
            OpKind::Remove,
            OpKind::Replace,
            OpKind::Move,
            OpKind::Copy,
            OpKind::Test,
        ] {
            assert_eq!(kind.as_str().parse::<OpKind>(), Ok(kind));
        }
        assert_eq!(
            "Add".parse::<OpKind>(),
            Err(UnknownOpKind("Add".to_string()))
        );
    }

    #[test]
    fn constructors_fill_required_fields() {
        let op = Operation::move_from("/a", "/b");
        assert_eq!(op.kind, OpKind::Move);
        assert_eq!(op.from.as_deref(), Some("/a"));
        assert_eq!(op.path, "/b");
        assert!(op.value.is_none());

        let op = Operation::test("/n", json!(null));
        assert_eq!(op.value, Some(Value::Null));
    }

    #[test]
    fn result_display() {
        assert_eq!(PatchResult::success().to_string(), "patch applied");
        let failed = PatchResult::failure(FailureReason::TestFailed, "nope");
        assert_eq!(failed.to_string(), "TestFailed: nope");
        assert!(!failed.succeeded);
    }
}
