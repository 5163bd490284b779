//! JSON Pointer (RFC 6901) utilities.
//!
//! This crate implements the pointer half of the patch engine: turning a
//! `/`-delimited pointer string into owned, unescaped segments and back, and
//! answering structural questions about pointers (root, parent, prefix).
//!
//! # Example
//!
//! ```
//! use patchable_json_pointer::{format_json_pointer, parse_json_pointer};
//!
//! // Parse a JSON pointer string into path components
//! let pointer = parse_json_pointer("/foo/bar").unwrap();
//! assert_eq!(pointer.segments(), ["foo", "bar"]);
//!
//! // Format path components back to a JSON pointer string
//! assert_eq!(format_json_pointer(pointer.segments()), "/foo/bar");
//! ```

use thiserror::Error;

pub mod types;
pub use types::Pointer;

/// Longest accepted pointer text, in bytes.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Deepest accepted pointer, in segments.
pub const MAX_PATH_LENGTH: usize = 256;

/// Literal path step addressing the slot after the last element of an array.
pub const APPEND_MARKER: &str = "-";

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use patchable_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 first, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// Per RFC 6901, `~` is replaced with `~0` and `/` is replaced with `~1`.
///
/// # Example
///
/// ```
/// use patchable_json_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// assert_eq!(escape_component("no-escapes"), "no-escapes");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Returns true when every `~` in a raw component starts a `~0` or `~1` escape.
pub fn has_valid_escapes(component: &str) -> bool {
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0') | Some('1')) {
            return false;
        }
    }
    true
}

/// Parse a JSON Pointer string into a [`Pointer`].
///
/// - Empty string parses to the root pointer
/// - Anything else must start with `/`
/// - Each component is checked for stray `~` and then unescaped
/// - Text over [`MAX_POINTER_LENGTH`] bytes or deeper than
///   [`MAX_PATH_LENGTH`] segments is refused
///
/// # Errors
///
/// See [`PointerError`].
///
/// # Example
///
/// ```
/// use patchable_json_pointer::{parse_json_pointer, PointerError};
///
/// assert!(parse_json_pointer("").unwrap().is_root());
/// assert_eq!(parse_json_pointer("/").unwrap().segments(), [""]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap().segments(), ["a~b", "c/d"]);
/// assert_eq!(parse_json_pointer("foo"), Err(PointerError::MissingLeadingSlash));
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Pointer, PointerError> {
    let Some(rest) = pointer.strip_prefix('/') else {
        return if pointer.is_empty() {
            Ok(Pointer::root())
        } else {
            Err(PointerError::MissingLeadingSlash)
        };
    };
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(PointerError::PointerTooLong);
    }
    let segments = rest
        .split('/')
        .enumerate()
        .map(|(depth, raw)| {
            if depth >= MAX_PATH_LENGTH {
                Err(PointerError::PathTooLong)
            } else if has_valid_escapes(raw) {
                Ok(unescape_component(raw))
            } else {
                Err(PointerError::InvalidEscape(raw.to_string()))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Pointer::from_segments(segments))
}

/// Format path components into a JSON Pointer string.
///
/// Returns an empty string for the root path (empty components).
///
/// # Example
///
/// ```
/// use patchable_json_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["foo".to_string(), "a/b".to_string()]), "/foo/a~1b");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.iter().map(|s| s.len() + 1).sum());
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a string represents a valid non-negative integer array index.
///
/// The append marker `-` is not an index; callers check for it separately.
///
/// # Example
///
/// ```
/// use patchable_json_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(u8::is_ascii_digit)
}

/// Parse an array index step, rejecting leading zeros and overflow.
pub fn parse_index(step: &str) -> Option<usize> {
    if !is_valid_index(step) {
        return None;
    }
    step.parse().ok()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/'")]
    MissingLeadingSlash,
    #[error("pointer is longer than {MAX_POINTER_LENGTH} bytes")]
    PointerTooLong,
    #[error("pointer is deeper than {MAX_PATH_LENGTH} segments")]
    PathTooLong,
    #[error("invalid escape sequence in segment '{0}'")]
    InvalidEscape(String),
}
