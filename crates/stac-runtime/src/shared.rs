//! Thread-safe handle to a [`StorageAccessControl`].
//!
//! ```text
//! SharedAccessControl ──clone──► SharedAccessControl
//!          │                              │
//!          └──────── Arc<RwLock<StorageAccessControl<E>>> ───┘
//! ```
//!
//! `register` and kind allocation take the write lock. Queries take the
//! read lock, so callbacks for concurrent queries may run in parallel and
//! a query never observes a half-registered tree.

use parking_lot::{RwLock, RwLockReadGuard};
use stac_auth::{AccessBits, AccessKinds, AccessTree, StorageAccessControl, StorageAccessError, StorageEvents};
use std::sync::Arc;

/// Cloneable, lock-guarded facade.
#[derive(Debug)]
pub struct SharedAccessControl<E> {
    inner: Arc<RwLock<StorageAccessControl<E>>>,
}

impl<E> Clone for SharedAccessControl<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: StorageEvents> SharedAccessControl<E> {
    /// Wraps a fresh facade over `events`.
    #[must_use]
    pub fn new(events: E) -> Self {
        Self::from_control(StorageAccessControl::new(events))
    }

    /// Wraps an already configured facade.
    #[must_use]
    pub fn from_control(control: StorageAccessControl<E>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(control)),
        }
    }

    /// See [`StorageAccessControl::register`].
    pub fn register(&self, tree: AccessTree) {
        self.inner.write().register(tree);
    }

    /// See [`StorageAccessControl::add_access_type`].
    ///
    /// # Errors
    ///
    /// [`StorageAccessError::AllocatorExhausted`] at the ceiling.
    pub fn add_access_type(&self) -> Result<AccessBits, StorageAccessError> {
        self.inner.write().add_access_type()
    }

    /// See [`StorageAccessControl::add_named_access_type`].
    ///
    /// # Errors
    ///
    /// Duplicate name or exhausted allocator.
    pub fn add_named_access_type(&self, name: &str) -> Result<AccessBits, StorageAccessError> {
        self.inner.write().add_named_access_type(name)
    }

    /// See [`StorageAccessControl::access`].
    ///
    /// # Errors
    ///
    /// As for the wrapped facade.
    pub fn access(
        &self,
        identifier: &str,
        access_type: AccessBits,
    ) -> Result<E::Accessor, StorageAccessError> {
        self.inner.read().access(identifier, access_type)
    }

    /// See [`StorageAccessControl::release`].
    ///
    /// # Errors
    ///
    /// As for the wrapped facade.
    pub fn release(
        &self,
        identifier: &str,
        access_type: Option<AccessBits>,
    ) -> Result<(), StorageAccessError> {
        self.inner.read().release(identifier, access_type)
    }

    /// See [`StorageAccessControl::release_dir`].
    ///
    /// # Errors
    ///
    /// As for the wrapped facade.
    pub fn release_dir(&self, identifier: &str) -> Result<(), StorageAccessError> {
        self.inner.read().release_dir(identifier)
    }

    /// See [`StorageAccessControl::register_bit`].
    ///
    /// # Errors
    ///
    /// Ancestor resolution failures.
    pub fn register_bit(&self, identifier: &str) -> Result<AccessBits, StorageAccessError> {
        self.inner.read().register_bit(identifier)
    }

    /// Snapshot of the kind registry.
    #[must_use]
    pub fn kinds(&self) -> AccessKinds {
        self.inner.read().kinds().clone()
    }

    /// Read guard over the wrapped facade, for several queries against
    /// one tree.
    pub fn read(&self) -> RwLockReadGuard<'_, StorageAccessControl<E>> {
        self.inner.read()
    }
}
