//! patchable: RFC 6902 JSON Patch applied in place to typed object graphs.
//!
//! A patch is a list of [`Operation`]s. Each operation names its target with
//! an RFC 6901 pointer that is resolved against the live object, the incoming
//! JSON value is coerced into the type of the slot it lands in, and the
//! mutation happens in place. Application stops at the first failing
//! operation and reports why in a [`PatchResult`]; earlier operations are not
//! undone.
//!
//! ```
//! use patchable::{apply, Operation};
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let mut scores: BTreeMap<String, Vec<u32>> = BTreeMap::new();
//! let result = apply(
//!     &mut scores,
//!     &[
//!         Operation::add("/alice", json!([3, 5])),
//!         Operation::add("/alice/1", json!(4)),
//!         Operation::copy_from("/alice", "/bob"),
//!     ],
//! );
//! assert!(result.succeeded);
//! assert_eq!(scores["bob"], [3, 4, 5]);
//! ```
//!
//! Layout:
//! - [`introspect`]: container views over target types
//! - [`coerce`]: decoded JSON into typed values
//! - [`resolve`]: pointers into writable or read-only locations
//! - [`execute`]: the six operations on a location
//! - [`json_patch`]: operation types, the apply loop and the wire codec
//! - [`json_cli`]: logic behind the `json-patch` binary

pub mod coerce;
pub mod execute;
pub mod introspect;
pub mod json_cli;
pub mod json_patch;
mod record;
pub mod resolve;

pub use coerce::{Coerce, CoercionError};
pub use execute::OperationError;
pub use introspect::{Container, ContainerMut, Indexed, Keyed, Patchable, SlotError};
pub use json_patch::{
    apply, apply_with_options, patch, patch_with_options, FailureReason, MemberMatching, OpKind,
    Operation, PatchOptions, PatchResult,
};
pub use resolve::{Location, LocationRef, ResolveError};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{Map, Value};
}
