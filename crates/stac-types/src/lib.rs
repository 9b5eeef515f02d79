//! Shared primitives for STAC.
//!
//! # Crate Architecture
//!
//! ```text
//! stac-types  (ErrorCode, identifier parsing)  ◄── THIS CRATE
//!     ↑
//! stac-auth   (AccessBits, AccessTree, StorageAccessControl)
//!     ↑
//! stac-runtime (config loading, MemoryStorage, SharedAccessControl)
//!     ↑
//! stac-cli    (`stac` binary)
//! ```

pub mod error;
pub mod identifier;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use identifier::Segment;
