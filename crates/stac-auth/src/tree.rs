//! Declarative permission tree.
//!
//! An [`AccessTree`] maps segment names to [`Node`]s. A node is either a
//! [`Node::Leaf`] holding the kinds allowed on one resource, or a
//! [`Node::Directory`] holding another tree.
//!
//! Two keys are reserved at every level:
//!
//! | Key | Matches |
//! |-----|---------|
//! | [`WILDCARD`] (`*`) | one otherwise-unmatched segment at this level |
//! | [`DEEP_WILDCARD`] (`**/*`) | this segment and every deeper unmatched one |
//!
//! # Serialized Form
//!
//! A leaf serializes as its integer mask, a directory as a nested map:
//!
//! ```json
//! { "a": { "b": 1, "*": { "**/*": 2147483647 } } }
//! ```

use crate::access::AccessBits;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Single-level wildcard key.
pub const WILDCARD: &str = "*";

/// Deep wildcard key.
pub const DEEP_WILDCARD: &str = "**/*";

/// One entry of an [`AccessTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Allowed kinds for a concrete resource.
    Leaf(#[serde(with = "bits_repr")] AccessBits),
    /// Nested level of the hierarchy.
    Directory(AccessTree),
}

impl Node {
    /// Returns `true` for [`Node::Directory`].
    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

impl From<AccessBits> for Node {
    fn from(bits: AccessBits) -> Self {
        Self::Leaf(bits)
    }
}

impl From<AccessTree> for Node {
    fn from(tree: AccessTree) -> Self {
        Self::Directory(tree)
    }
}

/// Mapping from segment name to [`Node`].
///
/// Trees are built once and registered wholesale; there is no
/// incremental mutation through the facade.
///
/// # Example
///
/// ```
/// use stac_auth::{AccessBits, AccessTree, DEEP_WILDCARD, WILDCARD};
///
/// let tree = AccessTree::new().dir(
///     "a",
///     AccessTree::new()
///         .leaf("b", AccessBits::BINARY)
///         .dir(WILDCARD, AccessTree::new().leaf(DEEP_WILDCARD, AccessBits::ANY)),
/// );
///
/// assert_eq!(tree.len(), 1);
/// assert!(tree.get("a").is_some_and(|n| n.is_directory()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessTree {
    entries: BTreeMap<String, Node>,
}

impl AccessTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf entry, replacing any existing entry of that name.
    #[must_use]
    pub fn leaf(mut self, name: impl Into<String>, bits: AccessBits) -> Self {
        self.entries.insert(name.into(), Node::Leaf(bits));
        self
    }

    /// Adds a directory entry, replacing any existing entry of that name.
    #[must_use]
    pub fn dir(mut self, name: impl Into<String>, subtree: AccessTree) -> Self {
        self.entries.insert(name.into(), Node::Directory(subtree));
        self
    }

    /// Inserts a node and returns the previous one, if any.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(name.into(), node.into())
    }

    /// Looks up an entry by its exact key.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    /// Number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if this level has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of leaves at any depth.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::Leaf(_) => 1,
                Node::Directory(sub) => sub.leaf_count(),
            })
            .sum()
    }
}

impl FromIterator<(String, Node)> for AccessTree {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Leaves travel as plain integers; allocated kinds have no name to print.
mod bits_repr {
    use super::*;

    pub fn serialize<S: Serializer>(bits: &AccessBits, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(bits.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AccessBits, D::Error> {
        u32::deserialize(deserializer).map(AccessBits::from_bits_retain)
    }
}
