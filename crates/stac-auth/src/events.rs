//! Event collaborator interface.
//!
//! The facade never touches storage itself. Once validation succeeds it
//! calls into a [`StorageEvents`] implementation, supplied by the storage
//! backend:
//!
//! ```text
//! access("a:c:d", JSON)
//!   on_access_dir("a")
//!   on_access_dir("a:c")
//!   on_access("a:c:d", JSON) ──► Accessor returned to the caller
//! ```
//!
//! Implementations take `&self`; backends that keep state use interior
//! mutability.

use crate::access::AccessBits;

/// Error type returned by collaborator callbacks.
pub type EventError = Box<dyn std::error::Error + Send + Sync>;

/// Callbacks invoked by [`StorageAccessControl`](crate::StorageAccessControl)
/// after a request has been validated.
pub trait StorageEvents {
    /// Capability object handed back on a successful access.
    type Accessor;

    /// Called once per ancestor directory, top-down, on every access.
    ///
    /// # Errors
    ///
    /// Any error aborts the access and reaches the caller as
    /// [`StorageAccessError::Event`](crate::StorageAccessError::Event).
    fn on_access_dir(&self, full_path: &str) -> Result<(), EventError>;

    /// Produces the accessor for a validated request.
    ///
    /// # Errors
    ///
    /// Propagated to the caller.
    fn on_access(&self, full_path: &str, access_type: AccessBits)
        -> Result<Self::Accessor, EventError>;

    /// Called on a successful release.
    ///
    /// # Errors
    ///
    /// Propagated to the caller.
    fn on_release(&self, full_path: &str) -> Result<(), EventError>;

    /// Called on a successful directory release.
    ///
    /// # Errors
    ///
    /// Propagated to the caller.
    fn on_release_dir(&self, full_path: &str) -> Result<(), EventError>;
}

impl<T: StorageEvents + ?Sized> StorageEvents for &T {
    type Accessor = T::Accessor;

    fn on_access_dir(&self, full_path: &str) -> Result<(), EventError> {
        (**self).on_access_dir(full_path)
    }

    fn on_access(
        &self,
        full_path: &str,
        access_type: AccessBits,
    ) -> Result<Self::Accessor, EventError> {
        (**self).on_access(full_path, access_type)
    }

    fn on_release(&self, full_path: &str) -> Result<(), EventError> {
        (**self).on_release(full_path)
    }

    fn on_release_dir(&self, full_path: &str) -> Result<(), EventError> {
        (**self).on_release_dir(full_path)
    }
}

impl<T: StorageEvents + ?Sized> StorageEvents for std::sync::Arc<T> {
    type Accessor = T::Accessor;

    fn on_access_dir(&self, full_path: &str) -> Result<(), EventError> {
        (**self).on_access_dir(full_path)
    }

    fn on_access(
        &self,
        full_path: &str,
        access_type: AccessBits,
    ) -> Result<Self::Accessor, EventError> {
        (**self).on_access(full_path, access_type)
    }

    fn on_release(&self, full_path: &str) -> Result<(), EventError> {
        (**self).on_release(full_path)
    }

    fn on_release_dir(&self, full_path: &str) -> Result<(), EventError> {
        (**self).on_release_dir(full_path)
    }
}
