//! Structural access to patch targets.
//!
//! A patch target is any value implementing [`Patchable`]. Values that can
//! hold other values expose themselves as one of two container kinds:
//!
//! - [`Keyed`]: named members (records, string-keyed maps, JSON objects)
//! - [`Indexed`]: integer-indexed sequences (vectors, deques, JSON arrays)
//!
//! The resolver walks a pointer through these views without knowing the
//! concrete types involved, and the executor reads and writes the final slot
//! through them. Writes always go through [`Coerce`], so every container
//! converts the incoming decoded value into its own element type.
//!
//! Adapters are provided for scalars, `Option`, `Box`, `Vec`, `VecDeque`,
//! `BTreeMap`, `HashMap`, `IndexMap` and `serde_json::Value`. Structs opt in
//! with [`patchable_record!`](crate::patchable_record).

mod leaf;
mod map;
mod seq;

use serde_json::Value;
use thiserror::Error;

use crate::coerce::{Coerce, CoercionError};

/// A value that can be the target of, or appear inside, a patch.
pub trait Patchable {
    /// Name of the concrete type, used in diagnostics.
    fn type_name(&self) -> String;

    /// Snapshot of the current value in decoded form.
    fn to_value(&self) -> Value;

    /// Read-only container view, or `None` for leaves and absent values.
    fn container(&self) -> Option<Container<'_>> {
        None
    }

    /// Mutable container view, or `None` for leaves and absent values.
    fn container_mut(&mut self) -> Option<ContainerMut<'_>> {
        None
    }
}

/// Named-member access.
///
/// A keyed container is either *closed* (a record: the member set is fixed
/// by its type) or *open* (a map: members can be created and deleted).
pub trait Keyed {
    fn is_open(&self) -> bool;

    fn member_names(&self) -> Vec<&str>;

    fn member(&self, name: &str) -> Option<&dyn Patchable>;

    fn member_mut(&mut self, name: &str) -> Option<&mut dyn Patchable>;

    /// Coerces `value` into the member's type and stores it.
    ///
    /// Open containers create missing members; closed containers reject them
    /// with [`SlotError::UnknownMember`].
    fn insert_member(&mut self, name: &str, value: &Value) -> Result<(), SlotError>;

    /// Removes the member from open containers, or resets it to its type's
    /// default in closed ones. Returns the previous value.
    fn reset_member(&mut self, name: &str) -> Result<Value, SlotError>;

    /// Coerces `value` into the member's type and compares it structurally.
    fn member_equals(&self, name: &str, value: &Value) -> Result<bool, SlotError>;
}

/// Integer-indexed sequence access.
pub trait Indexed {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn Patchable>;

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Patchable>;

    /// Coerces `value` and inserts it at `index`, shifting later elements.
    /// `index == len()` appends.
    fn insert_element(&mut self, index: usize, value: &Value) -> Result<(), SlotError>;

    /// Coerces `value` and overwrites the existing element at `index`.
    fn set_element(&mut self, index: usize, value: &Value) -> Result<(), SlotError>;

    /// Removes the element at `index`, returning its previous value.
    fn remove_element(&mut self, index: usize) -> Result<Value, SlotError>;

    fn element_equals(&self, index: usize, value: &Value) -> Result<bool, SlotError>;
}

pub enum Container<'a> {
    Keyed(&'a dyn Keyed),
    Indexed(&'a dyn Indexed),
}

pub enum ContainerMut<'a> {
    Keyed(&'a mut dyn Keyed),
    Indexed(&'a mut dyn Indexed),
}

impl Container<'_> {
    pub fn is_collection(&self) -> bool {
        matches!(self, Container::Indexed(_))
    }
}

impl ContainerMut<'_> {
    pub fn is_collection(&self) -> bool {
        matches!(self, ContainerMut::Indexed(_))
    }
}

/// Failure to read or write a single container slot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("member '{0}' does not exist")]
    UnknownMember(String),
    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// Coerces `value` into `slot`'s type and stores it.
pub fn assign<T: Coerce>(slot: &mut T, value: &Value) -> Result<(), CoercionError> {
    *slot = T::coerce(value)?;
    Ok(())
}

/// Resets `slot` to its default, returning the previous value.
pub fn reset<T: Patchable + Default>(slot: &mut T) -> Value {
    std::mem::take(slot).to_value()
}

/// Coerces `value` into `current`'s type and compares both structurally.
///
/// Comparison happens on decoded snapshots, so collections compare
/// element-wise and in order, and records member-wise.
pub fn slot_equals<T: Patchable + Coerce>(current: &T, value: &Value) -> Result<bool, CoercionError> {
    let expected = T::coerce(value)?;
    Ok(json_equal(&expected.to_value(), &current.to_value()))
}

/// Structural equality of decoded values where numbers compare by value, so
/// `1` equals `1.0`. Arrays compare in order, objects ignore key order.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}
