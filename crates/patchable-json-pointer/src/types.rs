//! Type definitions for JSON Pointer.

use std::fmt;
use std::str::FromStr;

use crate::{format_json_pointer, parse_json_pointer, PointerError};

/// A parsed JSON Pointer: a sequence of unescaped path steps.
///
/// The root pointer (`""`) has no steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// The root pointer.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a pointer from already unescaped segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final step, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Splits into the steps leading to the container and the final step.
    pub fn split_last(&self) -> Option<(&str, &[String])> {
        self.segments
            .split_last()
            .map(|(last, parents)| (last.as_str(), parents))
    }

    /// The pointer to the container of this pointer's target.
    ///
    /// # Example
    ///
    /// ```
    /// use patchable_json_pointer::parse_json_pointer;
    ///
    /// let p = parse_json_pointer("/a/b").unwrap();
    /// assert_eq!(p.parent().unwrap().to_string(), "/a");
    /// assert!(parse_json_pointer("").unwrap().parent().is_none());
    /// ```
    pub fn parent(&self) -> Option<Pointer> {
        self.segments
            .split_last()
            .map(|(_, parents)| Pointer::from_segments(parents.to_vec()))
    }

    /// True when `self` equals `other` or is one of its ancestors.
    ///
    /// # Example
    ///
    /// ```
    /// use patchable_json_pointer::parse_json_pointer;
    ///
    /// let a = parse_json_pointer("/a/b").unwrap();
    /// assert!(a.is_prefix_of(&parse_json_pointer("/a/b/c").unwrap()));
    /// assert!(a.is_prefix_of(&a));
    /// assert!(!a.is_prefix_of(&parse_json_pointer("/a/bc").unwrap()));
    /// ```
    pub fn is_prefix_of(&self, other: &Pointer) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True when `other` lies strictly below `self`.
    pub fn is_parent_of(&self, other: &Pointer) -> bool {
        self.segments.len() < other.segments.len() && self.is_prefix_of(other)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_json_pointer(&self.segments))
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_json_pointer(s)
    }
}
