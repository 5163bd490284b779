//! Value coercion: decoded JSON values into statically typed slots.
//!
//! Every conversion matches the decoded shape against the target type and
//! either produces the typed value or a [`CoercionError`]. There are no
//! truthy or stringy fallbacks: `"1"` is not a number, `1.0` is not an
//! integer, and an integer that does not fit the target width is rejected
//! rather than truncated.

use std::collections::{BTreeMap, HashMap, VecDeque};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Conversion from a decoded value into `Self`.
pub trait Coerce: Sized {
    /// Human-readable name of the target type, reported in errors.
    fn type_name() -> String;

    fn coerce(value: &Value) -> Result<Self, CoercionError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("The value could not be converted to type {target} (found {found})")]
pub struct CoercionError {
    pub target: String,
    pub found: String,
}

impl CoercionError {
    pub fn new(target: impl Into<String>, value: &Value) -> Self {
        Self {
            target: target.into(),
            found: shape_name(value).to_string(),
        }
    }

    pub fn unknown_member(target: impl Into<String>, member: &str) -> Self {
        Self {
            target: target.into(),
            found: format!("object with unknown member '{member}'"),
        }
    }
}

/// Name of the structural shape of a decoded value.
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Coerce for Value {
    fn type_name() -> String {
        "Value".to_string()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        Ok(value.clone())
    }
}

impl Coerce for bool {
    fn type_name() -> String {
        "bool".to_string()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        value
            .as_bool()
            .ok_or_else(|| CoercionError::new(Self::type_name(), value))
    }
}

impl Coerce for String {
    fn type_name() -> String {
        "String".to_string()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CoercionError::new(Self::type_name(), value))
    }
}

impl Coerce for char {
    fn type_name() -> String {
        "char".to_string()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        let mut chars = value.as_str().unwrap_or_default().chars();
        match (value.is_string(), chars.next(), chars.next()) {
            (true, Some(c), None) => Ok(c),
            _ => Err(CoercionError::new(Self::type_name(), value)),
        }
    }
}

macro_rules! coerce_signed {
    ($($ty:ty),*) => {$(
        impl Coerce for $ty {
            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn coerce(value: &Value) -> Result<Self, CoercionError> {
                value
                    .as_i64()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| CoercionError::new(Self::type_name(), value))
            }
        }
    )*};
}

macro_rules! coerce_unsigned {
    ($($ty:ty),*) => {$(
        impl Coerce for $ty {
            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn coerce(value: &Value) -> Result<Self, CoercionError> {
                value
                    .as_u64()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| CoercionError::new(Self::type_name(), value))
            }
        }
    )*};
}

coerce_signed!(i8, i16, i32, i64, isize);
coerce_unsigned!(u8, u16, u32, u64, usize);

impl Coerce for f64 {
    fn type_name() -> String {
        "f64".to_string()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        value
            .as_f64()
            .ok_or_else(|| CoercionError::new(Self::type_name(), value))
    }
}

impl Coerce for f32 {
    fn type_name() -> String {
        "f32".to_string()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        match value.as_f64() {
            Some(n) if n.abs() <= f64::from(f32::MAX) => Ok(n as f32),
            _ => Err(CoercionError::new(Self::type_name(), value)),
        }
    }
}

impl<T: Coerce> Coerce for Option<T> {
    fn type_name() -> String {
        format!("Option<{}>", T::type_name())
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        if value.is_null() {
            return Ok(None);
        }
        T::coerce(value).map(Some)
    }
}

impl<T: Coerce> Coerce for Box<T> {
    fn type_name() -> String {
        T::type_name()
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        T::coerce(value).map(Box::new)
    }
}

fn coerce_items<T: Coerce, C: FromIterator<T>>(
    target: String,
    value: &Value,
) -> Result<C, CoercionError> {
    let items = value
        .as_array()
        .ok_or_else(|| CoercionError::new(target, value))?;
    items.iter().map(T::coerce).collect()
}

fn coerce_entries<T: Coerce, C: FromIterator<(String, T)>>(
    target: String,
    value: &Value,
) -> Result<C, CoercionError> {
    let entries = value
        .as_object()
        .ok_or_else(|| CoercionError::new(target, value))?;
    entries
        .iter()
        .map(|(key, item)| Ok((key.clone(), T::coerce(item)?)))
        .collect()
}

impl<T: Coerce> Coerce for Vec<T> {
    fn type_name() -> String {
        format!("Vec<{}>", T::type_name())
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        coerce_items(Self::type_name(), value)
    }
}

impl<T: Coerce> Coerce for VecDeque<T> {
    fn type_name() -> String {
        format!("VecDeque<{}>", T::type_name())
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        coerce_items(Self::type_name(), value)
    }
}

impl<T: Coerce> Coerce for BTreeMap<String, T> {
    fn type_name() -> String {
        format!("BTreeMap<String, {}>", T::type_name())
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        coerce_entries(Self::type_name(), value)
    }
}

impl<T: Coerce> Coerce for HashMap<String, T> {
    fn type_name() -> String {
        format!("HashMap<String, {}>", T::type_name())
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        coerce_entries(Self::type_name(), value)
    }
}

impl<T: Coerce> Coerce for IndexMap<String, T> {
    fn type_name() -> String {
        format!("IndexMap<String, {}>", T::type_name())
    }

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        coerce_entries(Self::type_name(), value)
    }
}
