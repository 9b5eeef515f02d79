//! Storage access errors.
//!
//! Every failure of a facade call is a [`StorageAccessError`]. Validation
//! errors are raised before any collaborator callback runs; callback
//! failures come back as [`StorageAccessError::Event`] with the collaborator's
//! error as the source.
//!
//! ```text
//! access("a:b:c", bits)
//!   descend "a", "b"  ── NotRegistered / DirectoryMismatch
//!   resolve  "c"      ── NotRegistered / DirectoryMismatch / Denied
//!   callbacks         ── Event
//! ```

use crate::access::AccessBits;
use crate::events::EventError;
use stac_types::ErrorCode;
use std::fmt;
use thiserror::Error;

/// Shape of a tree entry, used to describe mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A leaf bitmask.
    Leaf,
    /// A nested directory.
    Directory,
    /// Nothing registered.
    Unregistered,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf => write!(f, "leaf"),
            Self::Directory => write!(f, "directory"),
            Self::Unregistered => write!(f, "nothing"),
        }
    }
}

/// Which collaborator callback failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`StorageEvents::on_access_dir`](crate::StorageEvents::on_access_dir).
    AccessDir,
    /// [`StorageEvents::on_access`](crate::StorageEvents::on_access).
    Access,
    /// [`StorageEvents::on_release`](crate::StorageEvents::on_release).
    Release,
    /// [`StorageEvents::on_release_dir`](crate::StorageEvents::on_release_dir).
    ReleaseDir,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessDir => write!(f, "on_access_dir"),
            Self::Access => write!(f, "on_access"),
            Self::Release => write!(f, "on_release"),
            Self::ReleaseDir => write!(f, "on_release_dir"),
        }
    }
}

/// Error returned by [`StorageAccessControl`](crate::StorageAccessControl).
#[derive(Debug, Error)]
pub enum StorageAccessError {
    /// No exact, `*` or `**/*` entry for a segment.
    #[error("storage '{path}' is not registered")]
    NotRegistered {
        /// Cumulative path of the unmatched segment.
        path: String,
    },

    /// An entry resolved to the wrong shape.
    #[error("storage '{path}': expected {expected}, found {found}")]
    DirectoryMismatch {
        /// Cumulative path of the offending segment.
        path: String,
        /// Shape the operation needed.
        expected: EntryKind,
        /// Shape actually registered.
        found: EntryKind,
    },

    /// The registered mask does not cover the request.
    #[error("storage '{path}' is not accessible: denied {denied_names}")]
    Denied {
        /// Identifier that was checked.
        path: String,
        /// Bits the caller asked for.
        requested: AccessBits,
        /// Requested bits the tree does not allow.
        denied: AccessBits,
        /// Display form of `denied`.
        denied_names: String,
    },

    /// No more access kinds can be allocated.
    #[error("access type allocator exhausted (ceiling {ceiling:#x})")]
    AllocatorExhausted {
        /// The `ANY` ceiling value.
        ceiling: u32,
    },

    /// An access kind with this name already exists.
    #[error("access kind '{name}' is already defined")]
    DuplicateKind {
        /// Upper-cased kind name.
        name: String,
    },

    /// A collaborator callback failed after validation succeeded.
    #[error("{event} failed for '{path}': {source}")]
    Event {
        /// Callback that failed.
        event: EventKind,
        /// Path passed to the callback.
        path: String,
        /// Error returned by the collaborator.
        #[source]
        source: EventError,
    },
}

impl StorageAccessError {
    /// Returns the denied bits for [`Denied`](Self::Denied), if any.
    #[must_use]
    pub fn denied_bits(&self) -> Option<AccessBits> {
        match self {
            Self::Denied { denied, .. } => Some(*denied),
            _ => None,
        }
    }

    /// Returns `true` when the failure happened before any callback ran.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Event { .. })
    }
}

impl ErrorCode for StorageAccessError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotRegistered { .. } => "ACCESS_NOT_REGISTERED",
            Self::DirectoryMismatch { .. } => "ACCESS_DIRECTORY_MISMATCH",
            Self::Denied { .. } => "ACCESS_DENIED",
            Self::AllocatorExhausted { .. } => "ACCESS_ALLOCATOR_EXHAUSTED",
            Self::DuplicateKind { .. } => "ACCESS_DUPLICATE_KIND",
            Self::Event { .. } => "ACCESS_EVENT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stac_types::assert_error_codes;
    use std::error::Error as _;

    fn all_variants() -> Vec<StorageAccessError> {
        vec![
            StorageAccessError::NotRegistered {
                path: "x".to_string(),
            },
            StorageAccessError::DirectoryMismatch {
                path: "a:b".to_string(),
                expected: EntryKind::Directory,
                found: EntryKind::Leaf,
            },
            StorageAccessError::Denied {
                path: "a:b".to_string(),
                requested: AccessBits::JSON,
                denied: AccessBits::JSON,
                denied_names: "JSON".to_string(),
            },
            StorageAccessError::AllocatorExhausted {
                ceiling: AccessBits::ANY.bits(),
            },
            StorageAccessError::DuplicateKind {
                name: "IMAGE".to_string(),
            },
            StorageAccessError::Event {
                event: EventKind::Access,
                path: "a".to_string(),
                source: "disk full".into(),
            },
        ]
    }

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(&all_variants(), "ACCESS_");
    }

    #[test]
    fn nothing_is_recoverable() {
        assert!(all_variants().iter().all(|e| !e.is_recoverable()));
    }

    #[test]
    fn not_registered_display() {
        let msg = all_variants()[0].to_string();
        assert_eq!(msg, "storage 'x' is not registered");
    }

    #[test]
    fn mismatch_display() {
        let msg = all_variants()[1].to_string();
        assert!(msg.contains("expected directory"), "got: {msg}");
        assert!(msg.contains("found leaf"), "got: {msg}");
    }

    #[test]
    fn denied_display_and_bits() {
        let err = &all_variants()[2];
        assert!(err.to_string().contains("denied JSON"), "got: {err}");
        assert_eq!(err.denied_bits(), Some(AccessBits::JSON));
        assert!(all_variants()[0].denied_bits().is_none());
    }

    #[test]
    fn allocator_display_hex() {
        let msg = all_variants()[3].to_string();
        assert!(msg.contains("0x7fffffff"), "got: {msg}");
    }

    #[test]
    fn event_keeps_source() {
        let variants = all_variants();
        let err = &variants[5];
        assert!(!err.is_validation());
        assert!(err.to_string().contains("on_access failed for 'a'"), "got: {err}");
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn validation_variants() {
        let variants = all_variants();
        assert!(variants[..5].iter().all(StorageAccessError::is_validation));
    }
}
