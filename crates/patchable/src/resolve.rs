//! Path resolution: pointer string → container slot.
//!
//! Resolution walks every step but the last through the target's container
//! views, then stops. The final step is not dereferenced; it is returned with
//! the container that owns it, so the executor can read, overwrite, insert or
//! remove at that slot.

use std::fmt;

use patchable_json_pointer::{parse_index, parse_json_pointer, Pointer, APPEND_MARKER};
use thiserror::Error;
use tracing::trace;

use crate::introspect::{Container, ContainerMut, Indexed, Keyed, Patchable};
use crate::json_patch::types::{MemberMatching, PatchOptions};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },
    #[error("path '{path}' not found: {reason}")]
    PathNotFound { path: String, reason: String },
}

impl ResolveError {
    fn not_found(pointer: &Pointer, reason: String) -> Self {
        ResolveError::PathNotFound {
            path: pointer.to_string(),
            reason,
        }
    }
}

/// Position inside an indexed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    At(usize),
    /// The `-` marker: one past the last element.
    Append,
}

impl Index {
    pub fn position(self, len: usize) -> usize {
        match self {
            Index::At(index) => index,
            Index::Append => len,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::At(index) => write!(f, "{index}"),
            Index::Append => f.write_str(APPEND_MARKER),
        }
    }
}

/// A writable slot: a borrowed container plus the key inside it.
pub enum Slot<'a> {
    Member {
        keyed: &'a mut dyn Keyed,
        name: String,
    },
    Element {
        indexed: &'a mut dyn Indexed,
        index: Index,
    },
}

/// A read-only slot.
pub enum SlotRef<'a> {
    Member {
        keyed: &'a dyn Keyed,
        name: String,
    },
    Element {
        indexed: &'a dyn Indexed,
        index: Index,
    },
}

/// Resolved, writable location. Borrows the target for one operation.
pub struct Location<'a> {
    pub slot: Slot<'a>,
    /// Type name of the owning container.
    pub container_type: String,
}

/// Resolved, read-only location.
pub struct LocationRef<'a> {
    pub slot: SlotRef<'a>,
    pub container_type: String,
}

impl Location<'_> {
    pub fn is_collection(&self) -> bool {
        matches!(self.slot, Slot::Element { .. })
    }

    pub fn key(&self) -> String {
        match &self.slot {
            Slot::Member { name, .. } => name.clone(),
            Slot::Element { index, .. } => index.to_string(),
        }
    }
}

impl<'a> LocationRef<'a> {
    pub fn is_collection(&self) -> bool {
        matches!(self.slot, SlotRef::Element { .. })
    }

    pub fn key(&self) -> String {
        match &self.slot {
            SlotRef::Member { name, .. } => name.clone(),
            SlotRef::Element { index, .. } => index.to_string(),
        }
    }

    /// The value currently stored at this slot, if the slot is populated.
    pub fn current(&self) -> Option<&'a dyn Patchable> {
        match self.slot {
            SlotRef::Member { keyed, ref name } => keyed.member(name),
            SlotRef::Element { indexed, index: Index::At(index) } => indexed.element(index),
            SlotRef::Element { index: Index::Append, .. } => None,
        }
    }
}

/// Parses an operation path. The root pointer has no container and is
/// rejected along with syntactically invalid pointers.
pub fn parse_path(path: &str) -> Result<Pointer, ResolveError> {
    let pointer = parse_json_pointer(path).map_err(|err| ResolveError::MalformedPath {
        path: path.to_string(),
        reason: err.to_string(),
    })?;
    if pointer.is_root() {
        return Err(ResolveError::MalformedPath {
            path: path.to_string(),
            reason: "the root has no containing object".to_string(),
        });
    }
    Ok(pointer)
}

/// Rewrites each member step of `pointer` to the member name it matches in
/// `root`. Steps past the first unresolvable one are kept verbatim.
pub fn canonical_pointer(root: &dyn Patchable, pointer: &Pointer, options: &PatchOptions) -> Pointer {
    let mut segments = Vec::with_capacity(pointer.len());
    let mut current = Some(root);
    for step in pointer.segments() {
        let (name, next) = match current.and_then(|value| value.container()) {
            Some(Container::Keyed(keyed)) => {
                match match_member(keyed, step, options.member_matching) {
                    Some(name) => {
                        let next = keyed.member(&name);
                        (name, next)
                    }
                    None => (step.clone(), None),
                }
            }
            Some(Container::Indexed(indexed)) => {
                (step.clone(), parse_index(step).and_then(|index| indexed.element(index)))
            }
            None => (step.clone(), None),
        };
        segments.push(name);
        current = next;
    }
    Pointer::from_segments(segments)
}

/// Finds the member of `keyed` that `step` addresses under `matching`.
fn match_member(keyed: &dyn Keyed, step: &str, matching: MemberMatching) -> Option<String> {
    if keyed.member(step).is_some() {
        return Some(step.to_string());
    }
    match matching {
        MemberMatching::Exact => None,
        MemberMatching::CaseInsensitive => {
            let wanted = step.to_lowercase();
            keyed
                .member_names()
                .into_iter()
                .find(|name| name.to_lowercase() == wanted)
                .map(str::to_string)
        }
    }
}

fn traversal_index(pointer: &Pointer, step: &str, len: usize) -> Result<usize, ResolveError> {
    if step == APPEND_MARKER {
        return Err(ResolveError::not_found(
            pointer,
            "'-' is only valid as the final segment".to_string(),
        ));
    }
    match parse_index(step) {
        Some(index) if index < len => Ok(index),
        Some(index) => Err(ResolveError::not_found(
            pointer,
            format!("index {index} is out of range for length {len}"),
        )),
        None => Err(ResolveError::not_found(
            pointer,
            format!("'{step}' is not a valid index"),
        )),
    }
}

fn terminal_index(pointer: &Pointer, step: &str) -> Result<Index, ResolveError> {
    if step == APPEND_MARKER {
        return Ok(Index::Append);
    }
    parse_index(step)
        .map(Index::At)
        .ok_or_else(|| ResolveError::not_found(pointer, format!("'{step}' is not a valid index")))
}

fn missing_member(pointer: &Pointer, step: &str, type_name: &str) -> ResolveError {
    ResolveError::not_found(pointer, format!("'{step}' is not a member of {type_name}"))
}

fn not_a_container(pointer: &Pointer, step: &str, type_name: &str) -> ResolveError {
    ResolveError::not_found(
        pointer,
        format!("cannot traverse into '{step}': {type_name} has no members"),
    )
}

/// Resolves `pointer` against `root` for writing.
pub fn resolve<'a>(
    root: &'a mut dyn Patchable,
    pointer: &Pointer,
    options: &PatchOptions,
) -> Result<Location<'a>, ResolveError> {
    let (last, parents) = pointer.split_last().ok_or_else(|| ResolveError::MalformedPath {
        path: String::new(),
        reason: "the root has no containing object".to_string(),
    })?;

    let mut current = root;
    for (depth, step) in parents.iter().enumerate() {
        let type_name = current.type_name();
        trace!(depth, step = %step, container = %type_name, "traversing");
        let next = match current.container_mut() {
            Some(ContainerMut::Keyed(keyed)) => {
                let name = match_member(&*keyed, step, options.member_matching)
                    .ok_or_else(|| missing_member(pointer, step, &type_name))?;
                keyed.member_mut(&name)
            }
            Some(ContainerMut::Indexed(indexed)) => {
                let index = traversal_index(pointer, step, indexed.len())?;
                indexed.element_mut(index)
            }
            None => None,
        };
        current = next.ok_or_else(|| not_a_container(pointer, step, &type_name))?;
    }

    let container_type = current.type_name();
    let slot = match current.container_mut() {
        Some(ContainerMut::Keyed(keyed)) => {
            let name = match_member(&*keyed, last, options.member_matching)
                .unwrap_or_else(|| last.to_string());
            Slot::Member { keyed, name }
        }
        Some(ContainerMut::Indexed(indexed)) => Slot::Element {
            indexed,
            index: terminal_index(pointer, last)?,
        },
        None => return Err(not_a_container(pointer, last, &container_type)),
    };
    Ok(Location {
        slot,
        container_type,
    })
}

/// Resolves `pointer` against `root` for reading.
pub fn resolve_ref<'a>(
    root: &'a dyn Patchable,
    pointer: &Pointer,
    options: &PatchOptions,
) -> Result<LocationRef<'a>, ResolveError> {
    let (last, parents) = pointer.split_last().ok_or_else(|| ResolveError::MalformedPath {
        path: String::new(),
        reason: "the root has no containing object".to_string(),
    })?;

    let mut current = root;
    for (depth, step) in parents.iter().enumerate() {
        trace!(depth, step = %step, "traversing (read-only)");
        let next = match current.container() {
            Some(Container::Keyed(keyed)) => {
                let name = match_member(keyed, step, options.member_matching)
                    .ok_or_else(|| missing_member(pointer, step, &current.type_name()))?;
                keyed.member(&name)
            }
            Some(Container::Indexed(indexed)) => {
                let index = traversal_index(pointer, step, indexed.len())?;
                indexed.element(index)
            }
            None => None,
        };
        current = next.ok_or_else(|| not_a_container(pointer, step, &current.type_name()))?;
    }

    let container_type = current.type_name();
    let slot = match current.container() {
        Some(Container::Keyed(keyed)) => {
            let name = match_member(keyed, last, options.member_matching)
                .unwrap_or_else(|| last.to_string());
            SlotRef::Member { keyed, name }
        }
        Some(Container::Indexed(indexed)) => SlotRef::Element {
            indexed,
            index: terminal_index(pointer, last)?,
        },
        None => return Err(not_a_container(pointer, last, &container_type)),
    };
    Ok(LocationRef {
        slot,
        container_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ptr(s: &str) -> Pointer {
        parse_path(s).unwrap()
    }

    #[test]
    fn parse_path_rejects_root_and_relative() {
        assert!(matches!(parse_path(""), Err(ResolveError::MalformedPath { .. })));
        assert!(matches!(parse_path("tags/0"), Err(ResolveError::MalformedPath { .. })));
        assert!(matches!(parse_path("/a~"), Err(ResolveError::MalformedPath { .. })));
        assert_eq!(parse_path("/a~1b").unwrap().segments(), ["a/b"]);
    }

    #[test]
    fn resolves_member_slot() {
        let mut doc = json!({"a": {"b": 1}});
        let loc = resolve(&mut doc, &ptr("/a/b"), &PatchOptions::default()).unwrap();
        assert!(!loc.is_collection());
        assert_eq!(loc.key(), "b");
        assert_eq!(loc.container_type, "object");
    }

    #[test]
    fn resolves_index_and_append() {
        let mut doc = json!({"tags": ["a", "b"]});
        let loc = resolve(&mut doc, &ptr("/tags/1"), &PatchOptions::default()).unwrap();
        assert!(loc.is_collection());
        assert_eq!(loc.key(), "1");

        let loc = resolve(&mut doc, &ptr("/tags/-"), &PatchOptions::default()).unwrap();
        assert!(matches!(loc.slot, Slot::Element { index: Index::Append, .. }));
    }

    #[test]
    fn final_index_is_not_bounds_checked() {
        let doc = json!({"list": [1, 2]});
        let loc = resolve_ref(&doc, &ptr("/list/5"), &PatchOptions::default()).unwrap();
        assert_eq!(loc.key(), "5");
        assert!(loc.current().is_none());
    }

    #[test]
    fn traversal_failures() {
        let doc = json!({"list": [1, {"x": null}], "n": null});
        let options = PatchOptions::default();
        for path in ["/missing/x", "/list/9/x", "/list/-/x", "/list/01/x", "/n/x", "/list/1/x/y"] {
            let err = resolve_ref(&doc, &ptr(path), &options).err();
            assert!(
                matches!(err, Some(ResolveError::PathNotFound { .. })),
                "expected PathNotFound for {path}"
            );
        }
    }

    #[test]
    fn final_step_on_collection_must_be_index() {
        let mut doc = json!({"list": [1]});
        let err = resolve(&mut doc, &ptr("/list/first"), &PatchOptions::default()).err();
        assert!(matches!(err, Some(ResolveError::PathNotFound { .. })));
    }

    #[test]
    fn canonical_pointer_uses_matched_names() {
        let doc = json!({"Items": [{"Name": 1}], "items": []});
        let relaxed = PatchOptions {
            member_matching: MemberMatching::CaseInsensitive,
        };
        let canonical = |path: &str, options: &PatchOptions| {
            canonical_pointer(&doc, &ptr(path), options).to_string()
        };
        assert_eq!(canonical("/ITEMS/0/name", &relaxed), "/Items/0/Name");
        assert_eq!(canonical("/items/0", &relaxed), "/items/0");
        assert_eq!(canonical("/Items/0/nAME/x", &relaxed), "/Items/0/Name/x");
        assert_eq!(canonical("/ITEMS/0", &PatchOptions::default()), "/ITEMS/0");
        assert_eq!(canonical("/nope/Deep", &relaxed), "/nope/Deep");
    }

    #[test]
    fn case_insensitive_matching() {
        let doc = json!({"Name": {"First": "Ada"}});
        let exact = PatchOptions::default();
        assert!(resolve_ref(&doc, &ptr("/name/first"), &exact).is_err());

        let relaxed = PatchOptions {
            member_matching: MemberMatching::CaseInsensitive,
        };
        let loc = resolve_ref(&doc, &ptr("/name/first"), &relaxed).unwrap();
        assert_eq!(loc.key(), "First");
        assert_eq!(loc.current().map(|v| v.to_value()), Some(json!("Ada")));
    }
}
