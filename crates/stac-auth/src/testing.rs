//! Test collaborator for the facade.
//!
//! [`RecordingEvents`] implements [`StorageEvents`] by appending every
//! callback to an in-memory log. Its accessor is the accessed path, so
//! tests can assert both ordering and the value handed back.
//!
//! ```
//! use stac_auth::testing::{Call, RecordingEvents};
//! use stac_auth::{AccessBits, StorageEvents};
//!
//! let events = RecordingEvents::new();
//! events.on_access_dir("a").unwrap();
//! let accessor = events.on_access("a:b", AccessBits::TEXT).unwrap();
//!
//! assert_eq!(accessor, "a:b");
//! assert_eq!(events.calls().len(), 2);
//! ```

use crate::access::AccessBits;
use crate::events::{EventError, StorageEvents};
use std::sync::Mutex;

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `on_access_dir(path)`.
    AccessDir(String),
    /// `on_access(path, bits)`.
    Access(String, AccessBits),
    /// `on_release(path)`.
    Release(String),
    /// `on_release_dir(path)`.
    ReleaseDir(String),
}

/// [`StorageEvents`] implementation that records calls.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<String>,
}

impl RecordingEvents {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes any callback for `path` fail (after being recorded).
    #[must_use]
    pub fn fail_on(mut self, path: impl Into<String>) -> Self {
        self.fail_on = Some(path.into());
        self
    }

    /// Returns a copy of the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, path: &str, call: Call) -> Result<(), EventError> {
        self.calls
            .lock()
            .map_err(|e| format!("recording lock poisoned: {e}"))?
            .push(call);
        if self.fail_on.as_deref() == Some(path) {
            return Err(format!("injected failure at '{path}'").into());
        }
        Ok(())
    }
}

impl StorageEvents for RecordingEvents {
    type Accessor = String;

    fn on_access_dir(&self, full_path: &str) -> Result<(), EventError> {
        self.record(full_path, Call::AccessDir(full_path.to_string()))
    }

    fn on_access(&self, full_path: &str, access_type: AccessBits) -> Result<String, EventError> {
        self.record(full_path, Call::Access(full_path.to_string(), access_type))?;
        Ok(full_path.to_string())
    }

    fn on_release(&self, full_path: &str) -> Result<(), EventError> {
        self.record(full_path, Call::Release(full_path.to_string()))
    }

    fn on_release_dir(&self, full_path: &str) -> Result<(), EventError> {
        self.record(full_path, Call::ReleaseDir(full_path.to_string()))
    }
}
