//! Operation execution on resolved locations.
//!
//! `add`, `remove` and `replace` consume a writable [`Location`]; `read` and
//! `test` take a read-only [`LocationRef`]. `move` and `copy` are composed by
//! the orchestrator from `read`/`remove` and `add`, after [`check_move`] has
//! rejected moves into the source's own subtree.

use patchable_json_pointer::Pointer;
use serde_json::Value;
use thiserror::Error;

use crate::coerce::CoercionError;
use crate::introspect::SlotError;
use crate::resolve::{Index, Location, LocationRef, Slot, SlotRef};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("member '{member}' does not exist on {container}")]
    MemberNotFound { member: String, container: String },
    #[error("index {index} is out of range for {container} of length {len}")]
    IndexOutOfRange {
        index: String,
        len: usize,
        container: String,
    },
    #[error("target '{key}' does not exist in {container}")]
    TargetNotFound { key: String, container: String },
    #[error("cannot move '{from}' to '{path}': the destination is inside the source")]
    InvalidMove { from: String, path: String },
    #[error(transparent)]
    TypeConversion(#[from] CoercionError),
    #[error("test failed at '{key}': expected {expected}, found {actual}")]
    TestFailed {
        key: String,
        expected: Value,
        actual: Value,
    },
}

/// Which error an unknown member turns into.
#[derive(Clone, Copy)]
enum Missing {
    Member,
    Target,
}

fn slot_failure(err: SlotError, key: &str, container: &str, missing: Missing) -> OperationError {
    match (err, missing) {
        (SlotError::UnknownMember(member), Missing::Member) => OperationError::MemberNotFound {
            member,
            container: container.to_string(),
        },
        (SlotError::UnknownMember(_), Missing::Target) => OperationError::TargetNotFound {
            key: key.to_string(),
            container: container.to_string(),
        },
        (SlotError::OutOfRange { index, len }, _) => OperationError::IndexOutOfRange {
            index: index.to_string(),
            len,
            container: container.to_string(),
        },
        (SlotError::Coercion(err), _) => OperationError::TypeConversion(err),
    }
}

fn out_of_range(index: Index, len: usize, container: &str) -> OperationError {
    OperationError::IndexOutOfRange {
        index: index.to_string(),
        len,
        container: container.to_string(),
    }
}

fn target_not_found(key: String, container: &str) -> OperationError {
    OperationError::TargetNotFound {
        key,
        container: container.to_string(),
    }
}

/// Inserts into a collection (shifting later elements; `-` appends) or sets a
/// member. Closed containers reject unknown members.
pub fn add(location: Location<'_>, value: &Value) -> Result<(), OperationError> {
    let key = location.key();
    let Location {
        slot,
        container_type,
    } = location;
    match slot {
        Slot::Element { indexed, index } => {
            let len = indexed.len();
            let at = index.position(len);
            if at > len {
                return Err(out_of_range(index, len, &container_type));
            }
            indexed
                .insert_element(at, value)
                .map_err(|err| slot_failure(err, &key, &container_type, Missing::Member))
        }
        Slot::Member { keyed, name } => keyed
            .insert_member(&name, value)
            .map_err(|err| slot_failure(err, &key, &container_type, Missing::Member)),
    }
}

/// Erases a collection element, or removes/resets a member. Returns the
/// previous value.
pub fn remove(location: Location<'_>) -> Result<Value, OperationError> {
    let key = location.key();
    let Location {
        slot,
        container_type,
    } = location;
    match slot {
        Slot::Element { indexed, index } => {
            let len = indexed.len();
            match index {
                Index::At(at) if at < len => indexed
                    .remove_element(at)
                    .map_err(|err| slot_failure(err, &key, &container_type, Missing::Target)),
                _ => Err(out_of_range(index, len, &container_type)),
            }
        }
        Slot::Member { keyed, name } => {
            let missing = if keyed.is_open() {
                Missing::Target
            } else {
                Missing::Member
            };
            keyed
                .reset_member(&name)
                .map_err(|err| slot_failure(err, &key, &container_type, missing))
        }
    }
}

/// Overwrites an existing element or member.
pub fn replace(location: Location<'_>, value: &Value) -> Result<(), OperationError> {
    let key = location.key();
    let Location {
        slot,
        container_type,
    } = location;
    match slot {
        Slot::Element { indexed, index } => match index {
            Index::At(at) if at < indexed.len() => indexed
                .set_element(at, value)
                .map_err(|err| slot_failure(err, &key, &container_type, Missing::Target)),
            _ => Err(target_not_found(key, &container_type)),
        },
        Slot::Member { keyed, name } => {
            if keyed.member(&name).is_none() {
                return Err(target_not_found(key, &container_type));
            }
            keyed
                .insert_member(&name, value)
                .map_err(|err| slot_failure(err, &key, &container_type, Missing::Target))
        }
    }
}

/// Snapshot of the value at a populated slot.
pub fn read(location: &LocationRef<'_>) -> Result<Value, OperationError> {
    location
        .current()
        .map(|current| current.to_value())
        .ok_or_else(|| target_not_found(location.key(), &location.container_type))
}

/// Compares the slot's value with `value` coerced to the slot's type.
pub fn test(location: &LocationRef<'_>, value: &Value) -> Result<(), OperationError> {
    let key = location.key();
    let container = location.container_type.as_str();
    let equal = match &location.slot {
        SlotRef::Element {
            indexed,
            index: Index::At(at),
        } if *at < indexed.len() => indexed
            .element_equals(*at, value)
            .map_err(|err| slot_failure(err, &key, container, Missing::Target))?,
        SlotRef::Element { .. } => return Err(target_not_found(key, container)),
        SlotRef::Member { keyed, name } => keyed
            .member_equals(name, value)
            .map_err(|err| slot_failure(err, &key, container, Missing::Target))?,
    };
    if equal {
        return Ok(());
    }
    let actual = read(location)?;
    Err(OperationError::TestFailed {
        key,
        expected: value.clone(),
        actual,
    })
}

/// Rejects moves whose destination is the source itself or lies below it.
///
/// Both pointers must name members as the target spells them (see
/// [`canonical_pointer`](crate::resolve::canonical_pointer)).
pub fn check_move(from: &Pointer, path: &Pointer) -> Result<(), OperationError> {
    if from.is_prefix_of(path) {
        return Err(OperationError::InvalidMove {
            from: from.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}
