//! JSON Patch apply logic: the per-operation resolve → execute loop.

use patchable_json_pointer::Pointer;
use serde_json::Value;
use tracing::{debug, warn};

use super::codec::from_json;
use super::types::{FailureReason, OpKind, Operation, PatchOptions, PatchResult};
use crate::execute::{self, OperationError};
use crate::introspect::Patchable;
use crate::resolve::{canonical_pointer, parse_path, resolve, resolve_ref, ResolveError};

/// A failed operation, already classified.
struct Failure {
    reason: FailureReason,
    message: String,
}

impl Failure {
    fn on_path(err: ResolveError) -> Self {
        Self {
            reason: FailureReason::CouldNotParsePath,
            message: err.to_string(),
        }
    }

    fn on_from(err: ResolveError) -> Self {
        Self {
            reason: FailureReason::CouldNotParseFrom,
            message: err.to_string(),
        }
    }

    fn on_operation(kind: OpKind) -> impl Fn(OperationError) -> Self {
        move |err| Self {
            reason: if kind == OpKind::Test {
                FailureReason::TestFailed
            } else {
                FailureReason::OperationFailed
            },
            message: err.to_string(),
        }
    }

    fn missing(reason: FailureReason, operation: &Operation, field: &str) -> Self {
        Self {
            reason,
            message: format!("operation '{}' requires '{field}'", operation.kind),
        }
    }
}

fn required_value(operation: &Operation) -> Result<&Value, Failure> {
    operation
        .value
        .as_ref()
        .ok_or_else(|| Failure::missing(FailureReason::OperationFailed, operation, "value"))
}

fn apply_operation(
    target: &mut dyn Patchable,
    operation: &Operation,
    options: &PatchOptions,
) -> Result<(), Failure> {
    let failed = Failure::on_operation(operation.kind);
    let path = parse_path(&operation.path).map_err(Failure::on_path)?;
    resolve_ref(target, &path, options).map_err(Failure::on_path)?;

    match operation.kind {
        OpKind::Add => {
            let value = required_value(operation)?;
            let location = resolve(target, &path, options).map_err(Failure::on_path)?;
            execute::add(location, value).map_err(failed)
        }
        OpKind::Remove => {
            let location = resolve(target, &path, options).map_err(Failure::on_path)?;
            execute::remove(location).map(drop).map_err(failed)
        }
        OpKind::Replace => {
            let value = required_value(operation)?;
            let location = resolve(target, &path, options).map_err(Failure::on_path)?;
            execute::replace(location, value).map_err(failed)
        }
        OpKind::Test => {
            let value = required_value(operation)?;
            let location = resolve_ref(target, &path, options).map_err(Failure::on_path)?;
            execute::test(&location, value).map_err(failed)
        }
        OpKind::Copy | OpKind::Move => {
            let from = operation
                .from
                .as_deref()
                .ok_or_else(|| Failure::missing(FailureReason::CouldNotParseFrom, operation, "from"))?;
            let from = parse_path(from).map_err(Failure::on_from)?;
            let source = resolve_ref(target, &from, options).map_err(Failure::on_from)?;
            let value = execute::read(&source).map_err(&failed)?;

            if operation.kind != OpKind::Move {
                let location = resolve(target, &path, options).map_err(Failure::on_path)?;
                return execute::add(location, &value).map_err(failed);
            }

            // Member names as the target spells them, so a restore after a
            // failed add cannot land on a different case variant.
            let source_at = canonical_pointer(target, &from, options);
            execute::check_move(&source_at, &canonical_pointer(target, &path, options))
                .map_err(&failed)?;
            let source = resolve(target, &from, options).map_err(Failure::on_from)?;
            execute::remove(source).map_err(&failed)?;
            // The destination is resolved against the target with the source
            // already removed.
            let moved = resolve(target, &path, options)
                .map_err(Failure::on_path)
                .and_then(|location| execute::add(location, &value).map_err(&failed));
            if moved.is_err() {
                restore(target, &source_at, &value);
            }
            moved
        }
    }
}

/// Puts a moved value back at its source after the destination rejected it.
fn restore(target: &mut dyn Patchable, from: &Pointer, value: &Value) {
    let restored = resolve(target, from, &PatchOptions::default())
        .map_err(|err| err.to_string())
        .and_then(|location| execute::add(location, value).map_err(|err| err.to_string()));
    if let Err(error) = restored {
        warn!(from = %from, %error, "could not restore the source of a failed move");
    }
}

/// Apply `operations` to `target` in order, stopping at the first failure.
///
/// Uses [`PatchOptions::default`].
pub fn apply(target: &mut dyn Patchable, operations: &[Operation]) -> PatchResult {
    apply_with_options(target, operations, &PatchOptions::default())
}

/// Apply `operations` to `target` in order, stopping at the first failure.
///
/// There is no rollback: operations applied before the failing one remain
/// applied on `target`.
pub fn apply_with_options(
    target: &mut dyn Patchable,
    operations: &[Operation],
    options: &PatchOptions,
) -> PatchResult {
    for (index, operation) in operations.iter().enumerate() {
        debug!(index, op = %operation.kind, path = %operation.path, "applying operation");
        if let Err(failure) = apply_operation(target, operation, options) {
            debug!(index, reason = %failure.reason, message = %failure.message, "patch halted");
            return PatchResult::failure(failure.reason, failure.message);
        }
    }
    PatchResult::success()
}

/// Decode a JSON Patch document and apply it to `target`.
///
/// Decoding failures are reported as [`FailureReason::CouldNotParseJson`].
pub fn patch(raw: &str, target: &mut dyn Patchable) -> PatchResult {
    patch_with_options(raw, target, &PatchOptions::default())
}

pub fn patch_with_options(
    raw: &str,
    target: &mut dyn Patchable,
    options: &PatchOptions,
) -> PatchResult {
    match from_json(raw) {
        Ok(operations) => apply_with_options(target, &operations, options),
        Err(err) => {
            debug!(error = %err, "patch document rejected");
            PatchResult::failure(FailureReason::CouldNotParseJson, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_patch::types::MemberMatching;
    use serde_json::json;

    #[test]
    fn add_into_array_scenario() {
        let mut doc = json!({"tags": ["a", "b"]});
        let result = apply(&mut doc, &[Operation::add("/tags/1", json!("x"))]);
        assert_eq!(result, PatchResult::success());
        assert_eq!(doc, json!({"tags": ["a", "x", "b"]}));
    }

    #[test]
    fn failed_test_scenario() {
        let mut doc = json!({"name": "Bob"});
        let result = apply(&mut doc, &[Operation::test("/name", json!("Alice"))]);
        assert!(!result.succeeded);
        assert_eq!(result.failure_reason, Some(FailureReason::TestFailed));
    }

    #[test]
    fn remove_out_of_range_scenario() {
        let mut doc = json!({"list": [1, 2]});
        let result = apply(&mut doc, &[Operation::remove("/list/5")]);
        assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
        assert!(result.message.unwrap().contains("out of range"));
    }

    #[test]
    fn failures_are_tagged_by_stage() {
        let mut doc = json!({"a": {"b": 1}, "list": []});
        let cases = [
            (Operation::add("a", json!(1)), FailureReason::CouldNotParsePath),
            (Operation::add("", json!(1)), FailureReason::CouldNotParsePath),
            (Operation::add("/x/y", json!(1)), FailureReason::CouldNotParsePath),
            (Operation::copy_from("/nope/x", "/a/c"), FailureReason::CouldNotParseFrom),
            (Operation::move_from("", "/a/c"), FailureReason::CouldNotParseFrom),
            (Operation::copy_from("/a/zz", "/a/c"), FailureReason::OperationFailed),
            (Operation::replace("/a/zz", json!(1)), FailureReason::OperationFailed),
            (Operation::test("/a/zz", json!(1)), FailureReason::TestFailed),
        ];
        for (operation, reason) in cases {
            let result = apply(&mut doc, std::slice::from_ref(&operation));
            assert_eq!(result.failure_reason, Some(reason), "{operation:?}");
            assert!(result.message.is_some());
        }
        assert_eq!(doc, json!({"a": {"b": 1}, "list": []}));
    }

    #[test]
    fn missing_operands() {
        let mut doc = json!({"a": 1});
        let no_value = Operation {
            kind: OpKind::Add,
            path: "/b".to_string(),
            from: None,
            value: None,
        };
        let result = apply(&mut doc, &[no_value]);
        assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));

        let no_from = Operation {
            kind: OpKind::Move,
            path: "/b".to_string(),
            from: None,
            value: None,
        };
        let result = apply(&mut doc, &[no_from]);
        assert_eq!(result.failure_reason, Some(FailureReason::CouldNotParseFrom));
    }

    #[test]
    fn move_then_add_resolves_after_removal() {
        let mut doc = json!({"list": ["a", "b", "c"]});
        let result = apply(&mut doc, &[Operation::move_from("/list/0", "/list/-")]);
        assert!(result.succeeded);
        assert_eq!(doc, json!({"list": ["b", "c", "a"]}));
    }

    #[test]
    fn invalid_move_leaves_target_untouched() {
        let mut doc = json!({"a": {"b": {"c": 1}}});
        let result = apply(&mut doc, &[Operation::move_from("/a/b", "/a/b/c")]);
        assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
        assert!(result.message.unwrap().contains("inside the source"));
        assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn failed_move_restores_source_element() {
        let mut doc = json!({"list": [1, 2, 3]});
        let result = apply(&mut doc, &[Operation::move_from("/list/0", "/list/3")]);
        assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
        assert!(result.message.unwrap().contains("out of range"));
        assert_eq!(doc, json!({"list": [1, 2, 3]}));
    }

    #[test]
    fn failed_move_restores_source_member() {
        let mut doc = json!({"a": {"b": 1}, "list": []});
        let result = apply(&mut doc, &[Operation::move_from("/a", "/list/1")]);
        assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
        assert_eq!(doc, json!({"a": {"b": 1}, "list": []}));
    }

    #[test]
    fn test_compares_numbers_by_value() {
        let mut doc = json!({"a": 1, "b": [2.0]});
        let result = apply(
            &mut doc,
            &[
                Operation::test("/a", json!(1.0)),
                Operation::test("/b", json!([2])),
            ],
        );
        assert!(result.succeeded, "{result}");
        let result = apply(&mut doc, &[Operation::test("/a", json!(1.5))]);
        assert_eq!(result.failure_reason, Some(FailureReason::TestFailed));
    }

    #[test]
    fn case_insensitive_move_checks_matched_members() {
        let relaxed = PatchOptions {
            member_matching: MemberMatching::CaseInsensitive,
        };
        let mut doc = json!({"Items": [1], "items": []});
        let result =
            apply_with_options(&mut doc, &[Operation::move_from("/Items", "/items/0")], &relaxed);
        assert!(result.succeeded, "{result}");
        assert_eq!(doc, json!({"items": [[1]]}));

        let mut doc = json!({"items": [1]});
        let result =
            apply_with_options(&mut doc, &[Operation::move_from("/items", "/ITEMS/0")], &relaxed);
        assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
        assert!(result.message.unwrap().contains("inside the source"));
        assert_eq!(doc, json!({"items": [1]}));
    }

    #[test]
    fn patch_reports_undecodable_documents() {
        let mut doc = json!({});
        let result = patch("{not json", &mut doc);
        assert_eq!(result.failure_reason, Some(FailureReason::CouldNotParseJson));

        let result = patch(r#"[{"op": "frobnicate", "path": "/a"}]"#, &mut doc);
        assert_eq!(result.failure_reason, Some(FailureReason::CouldNotParseJson));

        let result = patch(r#"[{"op": "add", "path": "/a", "value": null}]"#, &mut doc);
        assert!(result.succeeded);
        assert_eq!(doc, json!({"a": null}));
    }
}
