//! Access tree resolution.
//!
//! Every lookup follows the same precedence at its own level:
//!
//! ```text
//! exact name  →  "*"  →  "**/*"
//! ```
//!
//! Two modes build on it:
//!
//! - [`descend`] for intermediate segments. The match must be a directory.
//!   An exact leaf is a mismatch; `*` is only taken when it is a directory;
//!   `**/*` yields [`Cursor::Deep`], which keeps answering every deeper
//!   segment with the same rule.
//! - [`resolve_leaf`] for the final segment. Returns a [`Resolved`] variant
//!   and leaves the decision (report bits, or enforce) to the caller.

use crate::access::AccessBits;
use crate::error::{EntryKind, StorageAccessError};
use crate::tree::{AccessTree, Node, DEEP_WILDCARD, WILDCARD};
use stac_types::Segment;

/// Position reached while walking down a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor<'a> {
    /// A real tree level.
    Tree(&'a AccessTree),
    /// A matched `**/*` rule; behaves like a level containing only that rule.
    Deep(&'a Node),
}

impl<'a> Cursor<'a> {
    fn exact(self, name: &str) -> Option<&'a Node> {
        match self {
            Self::Tree(tree) => tree.get(name),
            Self::Deep(node) => (name == DEEP_WILDCARD).then_some(node),
        }
    }

    fn wildcard(self) -> Option<&'a Node> {
        match self {
            Self::Tree(tree) => tree.get(WILDCARD),
            Self::Deep(_) => None,
        }
    }

    fn deep(self) -> Option<&'a Node> {
        match self {
            Self::Tree(tree) => tree.get(DEEP_WILDCARD),
            Self::Deep(node) => Some(node),
        }
    }
}

/// What the final segment of an identifier resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// A leaf with its registered bits.
    Leaf(AccessBits),
    /// A directory node.
    Directory(&'a AccessTree),
    /// No exact, `*` or `**/*` entry.
    NotFound,
}

impl Resolved<'_> {
    /// Effective bits: the leaf mask, `DIR` for directories, `NOTHING` when
    /// unmatched.
    #[must_use]
    pub fn bits(&self) -> AccessBits {
        match self {
            Self::Leaf(bits) => *bits,
            Self::Directory(_) => AccessBits::DIR,
            Self::NotFound => AccessBits::NOTHING,
        }
    }

    /// Shape of the resolved entry.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Leaf(_) => EntryKind::Leaf,
            Self::Directory(_) => EntryKind::Directory,
            Self::NotFound => EntryKind::Unregistered,
        }
    }
}

impl<'a> From<&'a Node> for Resolved<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Leaf(bits) => Self::Leaf(*bits),
            Node::Directory(tree) => Self::Directory(tree),
        }
    }
}

/// Descends one intermediate segment.
///
/// # Errors
///
/// - [`StorageAccessError::DirectoryMismatch`] if the exact entry is a leaf
/// - [`StorageAccessError::NotRegistered`] if nothing usable matches
pub fn descend<'a>(cursor: Cursor<'a>, segment: &Segment) -> Result<Cursor<'a>, StorageAccessError> {
    if let Some(node) = cursor.exact(&segment.name) {
        return match node {
            Node::Directory(tree) => Ok(Cursor::Tree(tree)),
            Node::Leaf(_) => Err(StorageAccessError::DirectoryMismatch {
                path: segment.full.clone(),
                expected: EntryKind::Directory,
                found: EntryKind::Leaf,
            }),
        };
    }

    if let Some(Node::Directory(tree)) = cursor.wildcard() {
        return Ok(Cursor::Tree(tree));
    }

    match cursor.deep() {
        Some(rule) => Ok(Cursor::Deep(rule)),
        None => Err(StorageAccessError::NotRegistered {
            path: segment.full.clone(),
        }),
    }
}

/// Descends through every segment in `ancestors`, starting at `root`.
///
/// # Errors
///
/// Propagates the first [`descend`] failure.
pub fn descend_all<'a>(
    root: &'a AccessTree,
    ancestors: &[Segment],
) -> Result<Cursor<'a>, StorageAccessError> {
    ancestors
        .iter()
        .try_fold(Cursor::Tree(root), |cursor, segment| descend(cursor, segment))
}

/// Resolves the final segment without enforcing anything.
#[must_use]
pub fn resolve_leaf<'a>(cursor: Cursor<'a>, name: &str) -> Resolved<'a> {
    cursor
        .exact(name)
        .or_else(|| cursor.wildcard())
        .or_else(|| cursor.deep())
        .map_or(Resolved::NotFound, Resolved::from)
}
