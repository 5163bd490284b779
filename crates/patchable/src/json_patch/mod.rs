//! JSON Patch implementation (RFC 6902) over typed targets.
//!
//! # Operations
//!
//! All standard RFC 6902 operations are supported:
//! `add`, `remove`, `replace`, `copy`, `move`, `test`.
//!
//! Patches are applied in order and stop at the first failure. Nothing is
//! rolled back: earlier operations stay applied.

pub mod apply;
pub mod codec;
pub mod types;

pub use apply::{apply, apply_with_options, patch, patch_with_options};
pub use codec::{from_json, from_json_patch, to_json, to_json_patch, CodecError};
pub use types::{
    FailureReason, MemberMatching, OpKind, Operation, PatchOptions, PatchResult, UnknownOpKind,
};
