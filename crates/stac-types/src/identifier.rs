//! Colon-delimited storage identifiers.
//!
//! An identifier such as `"profile:avatars:alice"` names a resource inside
//! a hierarchy. [`split`] turns it into one [`Segment`] per level, each
//! carrying the bare name and the cumulative path up to that level:
//!
//! ```text
//! "profile:avatars:alice"
//!   [0] name = "profile"  full = "profile"
//!   [1] name = "avatars"  full = "profile:avatars"
//!   [2] name = "alice"    full = "profile:avatars:alice"
//! ```
//!
//! Splitting never validates segment content. Leading, trailing or doubled
//! delimiters produce empty segment names, which simply fail to match any
//! non-wildcard tree entry.

use serde::{Deserialize, Serialize};

/// Separator between identifier segments.
pub const DELIMITER: char = ':';

/// One level of a parsed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Bare segment name.
    pub name: String,
    /// Cumulative path up to and including this segment.
    pub full: String,
}

/// Splits `identifier` into ordered segments.
///
/// Always returns at least one segment; `""` yields a single empty one.
///
/// # Example
///
/// ```
/// use stac_types::identifier::split;
///
/// let segments = split("a:b:c");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1].name, "b");
/// assert_eq!(segments[1].full, "a:b");
/// ```
#[must_use]
pub fn split(identifier: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut end = 0;

    for name in identifier.split(DELIMITER) {
        end += name.len();
        segments.push(Segment {
            name: name.to_string(),
            full: identifier[..end].to_string(),
        });
        end += DELIMITER.len_utf8();
    }

    segments
}

/// Joins segment names back into an identifier.
#[must_use]
pub fn join<S: AsRef<str>>(names: &[S]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(name.as_ref());
    }
    out
}
