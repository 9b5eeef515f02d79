//! Storage access control facade.
//!
//! [`StorageAccessControl`] owns the registered [`AccessTree`], the bit
//! allocator and the kind registry, and drives a [`StorageEvents`]
//! collaborator. Every query validates first and only then fires
//! callbacks, so a failed call leaves the backend untouched.
//!
//! # Example
//!
//! ```
//! use stac_auth::testing::{Call, RecordingEvents};
//! use stac_auth::{AccessBits, AccessTree, StorageAccessControl, DEEP_WILDCARD, WILDCARD};
//!
//! let mut control = StorageAccessControl::new(RecordingEvents::new());
//! control.register(AccessTree::new().dir(
//!     "a",
//!     AccessTree::new()
//!         .leaf("b", AccessBits::BINARY)
//!         .dir(WILDCARD, AccessTree::new().leaf(DEEP_WILDCARD, AccessBits::ANY)),
//! ));
//!
//! control.access("a:b", AccessBits::BINARY).unwrap();
//! assert_eq!(
//!     control.events().calls(),
//!     vec![
//!         Call::AccessDir("a".into()),
//!         Call::Access("a:b".into(), AccessBits::BINARY),
//!     ]
//! );
//!
//! assert!(control.access("a:b", AccessBits::JSON).is_err());
//! ```

use crate::access::{compare, AccessBits, BitAllocator};
use crate::error::{EntryKind, EventKind, StorageAccessError};
use crate::events::StorageEvents;
use crate::kinds::AccessKinds;
use crate::resolver::{descend_all, resolve_leaf, Cursor, Resolved};
use crate::tree::AccessTree;
use stac_types::identifier::{self, Segment};
use tracing::{debug, trace};

/// Permission-checking front door to a storage backend.
///
/// State is limited to the registered tree, the next free access bit and
/// the names given to allocated bits. `register` and the allocation
/// methods take `&mut self`; every query takes `&self`. Wrap the facade in
/// a lock to share it across threads.
#[derive(Debug)]
pub struct StorageAccessControl<E> {
    events: E,
    tree: AccessTree,
    allocator: BitAllocator,
    kinds: AccessKinds,
}

impl<E: StorageEvents> StorageAccessControl<E> {
    /// Creates a facade with an empty tree.
    #[must_use]
    pub fn new(events: E) -> Self {
        Self {
            events,
            tree: AccessTree::new(),
            allocator: BitAllocator::new(),
            kinds: AccessKinds::new(),
        }
    }

    /// Replaces the registered tree wholesale.
    pub fn register(&mut self, tree: AccessTree) {
        debug!(
            entries = tree.len(),
            leaves = tree.leaf_count(),
            "Registering access tree"
        );
        self.tree = tree;
    }

    /// Allocates a new access kind bit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageAccessError::AllocatorExhausted`] once the `ANY`
    /// ceiling has been reached.
    pub fn add_access_type(&mut self) -> Result<AccessBits, StorageAccessError> {
        let bit = self.allocator.allocate()?;
        debug!(bit = bit.bits(), "Allocated access type");
        Ok(bit)
    }

    /// Allocates a new access kind bit and records its name.
    ///
    /// The name is checked before allocating, so a duplicate does not
    /// consume a bit.
    ///
    /// # Errors
    ///
    /// - [`StorageAccessError::DuplicateKind`] if the name is taken
    /// - [`StorageAccessError::AllocatorExhausted`] at the ceiling
    pub fn add_named_access_type(
        &mut self,
        name: &str,
    ) -> Result<AccessBits, StorageAccessError> {
        if self.kinds.lookup(name).is_some() {
            return Err(StorageAccessError::DuplicateKind {
                name: name.to_uppercase(),
            });
        }
        let bit = self.add_access_type()?;
        self.kinds.insert(name, bit)?;
        Ok(bit)
    }

    /// Validates and opens `identifier` for `access_type`.
    ///
    /// On success fires `on_access_dir` for every ancestor, root first,
    /// then returns the accessor produced by `on_access`.
    ///
    /// # Errors
    ///
    /// - [`StorageAccessError::NotRegistered`] if a segment has no entry
    /// - [`StorageAccessError::DirectoryMismatch`] if an ancestor is a leaf
    ///   or the final segment is a directory
    /// - [`StorageAccessError::Denied`] if any requested bit is not allowed
    /// - [`StorageAccessError::Event`] if a callback fails
    pub fn access(
        &self,
        identifier: &str,
        access_type: AccessBits,
    ) -> Result<E::Accessor, StorageAccessError> {
        let segments = identifier::split(identifier);
        let (last, ancestors) = split_final(&segments, identifier)?;

        let cursor = descend_all(&self.tree, ancestors)?;
        self.check_file_accessible(cursor, last, access_type)?;

        for dir in ancestors {
            trace!(path = %dir.full, "on_access_dir");
            self.events
                .on_access_dir(&dir.full)
                .map_err(|source| StorageAccessError::Event {
                    event: EventKind::AccessDir,
                    path: dir.full.clone(),
                    source,
                })?;
        }

        trace!(path = %last.full, bits = access_type.bits(), "on_access");
        self.events
            .on_access(&last.full, access_type)
            .map_err(|source| StorageAccessError::Event {
                event: EventKind::Access,
                path: last.full.clone(),
                source,
            })
    }

    /// Releases `identifier`.
    ///
    /// When `access_type` is given, it is re-checked against the current
    /// tree before `on_release` fires. Nothing records what was granted
    /// earlier.
    ///
    /// # Errors
    ///
    /// - ancestor failures as in [`register_bit`](Self::register_bit)
    /// - [`StorageAccessError::Denied`] if `access_type` is not covered
    /// - [`StorageAccessError::Event`] if `on_release` fails
    pub fn release(
        &self,
        identifier: &str,
        access_type: Option<AccessBits>,
    ) -> Result<(), StorageAccessError> {
        let registered = self.register_bit(identifier)?;

        if let Some(requested) = access_type {
            let result = compare(registered, requested);
            if !result.is_granted() {
                return Err(self.denied(identifier, requested, result.denied));
            }
        }

        trace!(path = %identifier, "on_release");
        self.events
            .on_release(identifier)
            .map_err(|source| StorageAccessError::Event {
                event: EventKind::Release,
                path: identifier.to_string(),
                source,
            })
    }

    /// Releases the directory `identifier`.
    ///
    /// The final segment must resolve to a directory node. A leaf whose
    /// mask happens to equal [`AccessBits::DIR`] does not qualify.
    ///
    /// # Errors
    ///
    /// - ancestor failures as in [`register_bit`](Self::register_bit)
    /// - [`StorageAccessError::DirectoryMismatch`] if not a directory
    /// - [`StorageAccessError::Event`] if `on_release_dir` fails
    pub fn release_dir(&self, identifier: &str) -> Result<(), StorageAccessError> {
        let resolved = self.resolve(identifier)?;

        if !matches!(resolved, Resolved::Directory(_)) {
            return Err(StorageAccessError::DirectoryMismatch {
                path: identifier.to_string(),
                expected: EntryKind::Directory,
                found: resolved.kind(),
            });
        }

        trace!(path = %identifier, "on_release_dir");
        self.events
            .on_release_dir(identifier)
            .map_err(|source| StorageAccessError::Event {
                event: EventKind::ReleaseDir,
                path: identifier.to_string(),
                source,
            })
    }

    /// Returns the effective bits registered for `identifier`.
    ///
    /// `DIR` for a directory, `NOTHING` when the final segment is
    /// unmatched. Never fails because of the final segment.
    ///
    /// # Errors
    ///
    /// [`StorageAccessError::NotRegistered`] or
    /// [`StorageAccessError::DirectoryMismatch`] from an ancestor.
    pub fn register_bit(&self, identifier: &str) -> Result<AccessBits, StorageAccessError> {
        self.resolve(identifier).map(|resolved| resolved.bits())
    }

    /// Resolves `identifier` down to its final entry.
    ///
    /// # Errors
    ///
    /// Ancestor resolution failures.
    pub fn resolve(&self, identifier: &str) -> Result<Resolved<'_>, StorageAccessError> {
        let segments = identifier::split(identifier);
        let (last, ancestors) = split_final(&segments, identifier)?;
        let cursor = descend_all(&self.tree, ancestors)?;
        Ok(resolve_leaf(cursor, &last.name))
    }

    /// Returns the registered tree.
    #[must_use]
    pub fn tree(&self) -> &AccessTree {
        &self.tree
    }

    /// Returns the kind registry.
    #[must_use]
    pub fn kinds(&self) -> &AccessKinds {
        &self.kinds
    }

    /// Returns the event collaborator.
    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Enforcing resolution of the final segment.
    fn check_file_accessible(
        &self,
        cursor: Cursor<'_>,
        segment: &Segment,
        access_type: AccessBits,
    ) -> Result<(), StorageAccessError> {
        match resolve_leaf(cursor, &segment.name) {
            Resolved::Leaf(registered) => {
                let result = compare(registered, access_type);
                if result.is_granted() {
                    Ok(())
                } else {
                    Err(self.denied(&segment.full, access_type, result.denied))
                }
            }
            Resolved::Directory(_) => Err(StorageAccessError::DirectoryMismatch {
                path: segment.full.clone(),
                expected: EntryKind::Leaf,
                found: EntryKind::Directory,
            }),
            Resolved::NotFound => Err(StorageAccessError::NotRegistered {
                path: segment.full.clone(),
            }),
        }
    }

    fn denied(
        &self,
        path: &str,
        requested: AccessBits,
        denied: AccessBits,
    ) -> StorageAccessError {
        let denied_names = self.kinds.describe(denied);
        debug!(path = %path, denied = %denied_names, "Access denied");
        StorageAccessError::Denied {
            path: path.to_string(),
            requested,
            denied,
            denied_names,
        }
    }
}

/// Splits parsed segments into the final one and its ancestors.
fn split_final<'s>(
    segments: &'s [Segment],
    identifier: &str,
) -> Result<(&'s Segment, &'s [Segment]), StorageAccessError> {
    segments
        .split_last()
        .ok_or_else(|| StorageAccessError::NotRegistered {
            path: identifier.to_string(),
        })
}
