//! In-memory storage backend.
//!
//! [`MemoryStorage`] implements [`StorageEvents`] over a shared map of
//! byte buffers. `on_access` hands out a [`MemAccessor`] whose view is
//! picked from the requested kinds:
//!
//! | Requested bit (first match) | Accessor |
//! |-----------------------------|----------|
//! | `BINARY` | [`MemBinaryAccessor`] |
//! | `JSON` | [`MemJsonAccessor`] |
//! | `TEXT` | [`MemTextAccessor`] |
//!
//! All views of one path share the same bytes. Entries live until
//! released: `on_release` drops the entry, `on_release_dir` drops every
//! entry and directory under the prefix.
//!
//! # Example
//!
//! ```
//! use stac_auth::{AccessBits, AccessTree, StorageAccessControl};
//! use stac_runtime::memory::{MemAccessor, MemoryStorage};
//!
//! let storage = MemoryStorage::new();
//! let mut control = StorageAccessControl::new(storage.clone());
//! control.register(AccessTree::new().dir(
//!     "notes",
//!     AccessTree::new().leaf("today", AccessBits::TEXT),
//! ));
//!
//! let MemAccessor::Text(text) = control.access("notes:today", AccessBits::TEXT)? else {
//!     unreachable!()
//! };
//! text.write("buy milk");
//! assert_eq!(text.read()?.as_deref(), Some("buy milk"));
//! assert!(storage.has_directory("notes"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stac_auth::{AccessBits, EventError, StorageEvents};
use stac_types::identifier::DELIMITER;
use stac_types::ErrorCode;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised by the in-memory backend and its accessors.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The request carried none of `BINARY`, `JSON` or `TEXT`.
    #[error("no in-memory accessor for access bits {bits:#x}")]
    UnsupportedKind { bits: u32 },

    /// Stored bytes are not valid UTF-8.
    #[error("entry '{path}' is not valid text: {source}")]
    InvalidText {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Stored bytes are not valid JSON (or not the requested shape).
    #[error("entry '{path}' is not valid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ErrorCode for MemoryError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedKind { .. } => "MEMORY_UNSUPPORTED_KIND",
            Self::InvalidText { .. } | Self::InvalidJson { .. } => "MEMORY_DECODE",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Rewriting the entry fixes a decode failure.
        !matches!(self, Self::UnsupportedKind { .. })
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, Vec<u8>>,
    directories: BTreeSet<String>,
}

type SharedState = Arc<Mutex<MemoryState>>;

/// Shared in-memory backend. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: SharedState,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if an entry exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().entries.contains_key(path)
    }

    /// Returns `true` if `path` has been entered as a directory.
    #[must_use]
    pub fn has_directory(&self, path: &str) -> bool {
        self.state.lock().directories.contains(path)
    }

    /// Entered directories in sorted order.
    #[must_use]
    pub fn directories(&self) -> Vec<String> {
        self.state.lock().directories.iter().cloned().collect()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.state.lock().entries.len()
    }
}

impl StorageEvents for MemoryStorage {
    type Accessor = MemAccessor;

    fn on_access_dir(&self, full_path: &str) -> Result<(), EventError> {
        if self.state.lock().directories.insert(full_path.to_string()) {
            trace!(path = %full_path, "memory: directory created");
        }
        Ok(())
    }

    fn on_access(&self, full_path: &str, access_type: AccessBits) -> Result<MemAccessor, EventError> {
        let handle = Handle {
            path: full_path.to_string(),
            state: Arc::clone(&self.state),
        };

        let accessor = if access_type.contains(AccessBits::BINARY) {
            MemAccessor::Binary(MemBinaryAccessor(handle))
        } else if access_type.contains(AccessBits::JSON) {
            MemAccessor::Json(MemJsonAccessor(handle))
        } else if access_type.contains(AccessBits::TEXT) {
            MemAccessor::Text(MemTextAccessor(handle))
        } else {
            return Err(MemoryError::UnsupportedKind {
                bits: access_type.bits(),
            }
            .into());
        };

        trace!(path = %full_path, kind = accessor.kind_name(), "memory: accessor issued");
        Ok(accessor)
    }

    fn on_release(&self, full_path: &str) -> Result<(), EventError> {
        if self.state.lock().entries.remove(full_path).is_some() {
            debug!(path = %full_path, "memory: entry released");
        }
        Ok(())
    }

    fn on_release_dir(&self, full_path: &str) -> Result<(), EventError> {
        let prefix = format!("{full_path}{DELIMITER}");
        let under = |key: &String| key == full_path || key.starts_with(&prefix);

        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|key, _| !under(key));
        state.directories.retain(|key| !under(key));
        debug!(
            path = %full_path,
            removed = before - state.entries.len(),
            "memory: directory released"
        );
        Ok(())
    }
}

/// Path plus shared state; the common part of every accessor.
#[derive(Debug, Clone)]
struct Handle {
    path: String,
    state: SharedState,
}

impl Handle {
    fn read_bytes(&self) -> Option<Vec<u8>> {
        self.state.lock().entries.get(&self.path).cloned()
    }

    fn write_bytes(&self, bytes: Vec<u8>) {
        self.state.lock().entries.insert(self.path.clone(), bytes);
    }

    fn exists(&self) -> bool {
        self.state.lock().entries.contains_key(&self.path)
    }
}

/// Accessor returned by [`MemoryStorage`].
#[derive(Debug, Clone)]
pub enum MemAccessor {
    /// Issued when `BINARY` was requested.
    Binary(MemBinaryAccessor),
    /// Issued for `JSON` without `BINARY`.
    Json(MemJsonAccessor),
    /// Issued for `TEXT` alone among the named views.
    Text(MemTextAccessor),
}

impl MemAccessor {
    /// Path this accessor is bound to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Binary(a) => &a.0.path,
            Self::Json(a) => &a.0.path,
            Self::Text(a) => &a.0.path,
        }
    }

    /// `"binary"`, `"json"` or `"text"`.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Binary(_) => "binary",
            Self::Json(_) => "json",
            Self::Text(_) => "text",
        }
    }
}

/// Raw byte view of an entry.
#[derive(Debug, Clone)]
pub struct MemBinaryAccessor(Handle);

impl MemBinaryAccessor {
    /// Returns the stored bytes, or `None` if nothing was written yet.
    #[must_use]
    pub fn read(&self) -> Option<Vec<u8>> {
        self.0.read_bytes()
    }

    /// Replaces the stored bytes.
    pub fn write(&self, bytes: &[u8]) {
        self.0.write_bytes(bytes.to_vec());
    }

    /// Returns `true` if the entry exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.0.exists()
    }
}

/// UTF-8 text view of an entry.
#[derive(Debug, Clone)]
pub struct MemTextAccessor(Handle);

impl MemTextAccessor {
    /// Returns the stored text.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidText`] if the bytes are not UTF-8.
    pub fn read(&self) -> Result<Option<String>, MemoryError> {
        self.0
            .read_bytes()
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|source| MemoryError::InvalidText {
                    path: self.0.path.clone(),
                    source,
                })
            })
            .transpose()
    }

    /// Replaces the stored text.
    pub fn write(&self, text: &str) {
        self.0.write_bytes(text.as_bytes().to_vec());
    }

    /// Appends to the stored bytes, creating the entry if needed.
    pub fn append(&self, text: &str) {
        let mut state = self.0.state.lock();
        state
            .entries
            .entry(self.0.path.clone())
            .or_default()
            .extend_from_slice(text.as_bytes());
    }
}

/// JSON view of an entry.
#[derive(Debug, Clone)]
pub struct MemJsonAccessor(Handle);

impl MemJsonAccessor {
    /// Returns the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidJson`] if the bytes are not JSON.
    pub fn read(&self) -> Result<Option<Value>, MemoryError> {
        self.read_as()
    }

    /// Returns the stored document deserialized as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidJson`] if the bytes are not JSON
    /// or do not match `T`.
    pub fn read_as<T: DeserializeOwned>(&self) -> Result<Option<T>, MemoryError> {
        self.0
            .read_bytes()
            .map(|bytes| {
                serde_json::from_slice(&bytes).map_err(|source| MemoryError::InvalidJson {
                    path: self.0.path.clone(),
                    source,
                })
            })
            .transpose()
    }

    /// Replaces the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidJson`] if `value` cannot be encoded.
    pub fn write<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<(), MemoryError> {
        let bytes = serde_json::to_vec(value).map_err(|source| MemoryError::InvalidJson {
            path: self.0.path.clone(),
            source,
        })?;
        self.0.write_bytes(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stac_types::assert_error_codes;

    fn access(storage: &MemoryStorage, path: &str, bits: AccessBits) -> MemAccessor {
        storage.on_access(path, bits).expect("accessor")
    }

    #[test]
    fn picks_view_by_lowest_named_bit() {
        let storage = MemoryStorage::new();
        assert_eq!(access(&storage, "a", AccessBits::BINARY | AccessBits::TEXT).kind_name(), "binary");
        assert_eq!(access(&storage, "a", AccessBits::JSON | AccessBits::TEXT).kind_name(), "json");
        assert_eq!(access(&storage, "a", AccessBits::TEXT).kind_name(), "text");
        assert_eq!(access(&storage, "a:b", AccessBits::TEXT).path(), "a:b");
    }

    #[test]
    fn unsupported_kind_is_error() {
        let storage = MemoryStorage::new();
        let err = storage
            .on_access("a", AccessBits::from_bits_retain(8))
            .unwrap_err();
        let err = err.downcast::<MemoryError>().expect("memory error");
        assert!(matches!(*err, MemoryError::UnsupportedKind { bits: 8 }));
    }

    #[test]
    fn views_share_bytes() {
        let storage = MemoryStorage::new();
        let MemAccessor::Json(json_view) = access(&storage, "doc", AccessBits::JSON) else {
            panic!("expected json");
        };
        json_view.write(&json!({"k": 1})).unwrap();

        let MemAccessor::Text(text_view) = access(&storage, "doc", AccessBits::TEXT) else {
            panic!("expected text");
        };
        assert_eq!(text_view.read().unwrap().as_deref(), Some(r#"{"k":1}"#));
        assert_eq!(json_view.read().unwrap(), Some(json!({"k": 1})));
    }

    #[test]
    fn text_append_and_invalid_utf8() {
        let storage = MemoryStorage::new();
        let MemAccessor::Text(text) = access(&storage, "log", AccessBits::TEXT) else {
            panic!("expected text");
        };
        assert_eq!(text.read().unwrap(), None);
        text.append("a");
        text.append("b");
        assert_eq!(text.read().unwrap().as_deref(), Some("ab"));

        let MemAccessor::Binary(bin) = access(&storage, "log", AccessBits::BINARY) else {
            panic!("expected binary");
        };
        bin.write(&[0xff, 0xfe]);
        assert!(matches!(text.read(), Err(MemoryError::InvalidText { .. })));
    }

    #[test]
    fn json_read_as_typed() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Profile {
            name: String,
        }

        let storage = MemoryStorage::new();
        let MemAccessor::Json(doc) = access(&storage, "p", AccessBits::JSON) else {
            panic!("expected json");
        };
        doc.write(&json!({"name": "kim"})).unwrap();
        assert_eq!(
            doc.read_as::<Profile>().unwrap(),
            Some(Profile {
                name: "kim".to_string()
            })
        );

        let MemAccessor::Text(text) = access(&storage, "p", AccessBits::TEXT) else {
            panic!("expected text");
        };
        text.write("not json");
        assert!(matches!(doc.read(), Err(MemoryError::InvalidJson { .. })));
    }

    #[test]
    fn release_drops_entry() {
        let storage = MemoryStorage::new();
        let MemAccessor::Binary(bin) = access(&storage, "a:b", AccessBits::BINARY) else {
            panic!("expected binary");
        };
        bin.write(b"data");
        assert!(storage.contains("a:b"));

        storage.on_release("a:b").unwrap();
        assert!(!storage.contains("a:b"));
        assert!(!bin.exists());
        // Releasing again is a no-op.
        storage.on_release("a:b").unwrap();
    }

    #[test]
    fn release_dir_drops_prefix_only() {
        let storage = MemoryStorage::new();
        for dir in ["a", "a:b", "ab"] {
            storage.on_access_dir(dir).unwrap();
        }
        for path in ["a:b:c", "a:x", "ab:y"] {
            let MemAccessor::Binary(bin) = access(&storage, path, AccessBits::BINARY) else {
                panic!("expected binary");
            };
            bin.write(b"1");
        }

        storage.on_release_dir("a").unwrap();
        assert_eq!(storage.entry_count(), 1);
        assert!(storage.contains("ab:y"));
        assert_eq!(storage.directories(), vec!["ab".to_string()]);
    }

    #[test]
    fn access_dir_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.on_access_dir("a").unwrap();
        storage.on_access_dir("a").unwrap();
        assert_eq!(storage.directories(), vec!["a".to_string()]);
    }

    #[test]
    fn error_codes() {
        let utf8_err = String::from_utf8(vec![0xff]).unwrap_err();
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        assert_error_codes(
            &[
                MemoryError::UnsupportedKind { bits: 8 },
                MemoryError::InvalidText {
                    path: "a".to_string(),
                    source: utf8_err,
                },
                MemoryError::InvalidJson {
                    path: "a".to_string(),
                    source: json_err,
                },
            ],
            "MEMORY_",
        );
    }
}
