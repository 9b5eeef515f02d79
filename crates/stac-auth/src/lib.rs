//! Permission-tree access control for hierarchical storage identifiers.
//!
//! Resources are named by colon-separated identifiers (`"a:b:c"`). An
//! [`AccessTree`] declares, level by level, which access kinds each
//! resource allows, with `*` and `**/*` wildcards for pattern grants.
//! [`StorageAccessControl`] checks requests against the tree and, only
//! when a request is valid, drives the storage backend through
//! [`StorageEvents`].
//!
//! # Layers
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Identifier | `stac_types::identifier` | split into `(name, cumulative path)` |
//! | Bits | [`access`] | [`AccessBits`], [`compare`], [`BitAllocator`] |
//! | Tree | [`tree`], [`resolver`] | exact → `*` → `**/*` lookup |
//! | Facade | [`control`] | validate, then call back |
//!
//! # Crate Architecture
//!
//! ```text
//! stac-types  (ErrorCode, identifier)
//!     ↑
//! stac-auth  ◄── THIS CRATE
//!     ↑
//! stac-runtime (config loading, MemoryStorage, SharedAccessControl)
//! ```
//!
//! The crate performs no storage I/O and keeps no record of open
//! accessors. `release` re-checks against whatever tree is registered now.

pub mod access;
pub mod control;
pub mod error;
pub mod events;
pub mod kinds;
pub mod resolver;
pub mod testing;
pub mod tree;

pub use access::{compare, AccessBits, AccessComparison, BitAllocator};
pub use control::StorageAccessControl;
pub use error::{EntryKind, EventKind, StorageAccessError};
pub use events::{EventError, StorageEvents};
pub use kinds::AccessKinds;
pub use resolver::{Cursor, Resolved};
pub use tree::{AccessTree, Node, DEEP_WILDCARD, WILDCARD};
