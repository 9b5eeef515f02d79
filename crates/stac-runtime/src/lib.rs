//! Runtime wiring for STAC.
//!
//! # Crate Architecture
//!
//! ```text
//! stac-types  (ErrorCode, identifier)
//!     ↑
//! stac-auth   (AccessTree, StorageAccessControl, StorageEvents)
//!     ↑
//! stac-runtime  ◄── THIS CRATE
//!     ↑
//! stac-cli    (stac binary)
//! ```
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`config`] | layered [`StacConfig`](config::StacConfig), tree files |
//! | [`memory`] | [`MemoryStorage`] backend |
//! | [`shared`] | [`SharedAccessControl`] |
//!
//! [`build_access_control`] ties them together:
//!
//! ```
//! use stac_auth::AccessBits;
//! use stac_runtime::config::StacConfig;
//! use stac_runtime::{build_access_control, MemoryStorage, SharedAccessControl};
//!
//! let config: StacConfig = StacConfig::from_toml(
//!     r#"
//! kinds = ["image"]
//!
//! [tree.inline.photos]
//! "*" = ["IMAGE", "BINARY"]
//! "#,
//! )?;
//! let control = build_access_control(&config, MemoryStorage::new())?;
//! let shared = SharedAccessControl::from_control(control);
//!
//! let image = shared.kinds().lookup("image").unwrap_or(AccessBits::NOTHING);
//! assert!(shared.access("photos:cat", image | AccessBits::BINARY).is_ok());
//! assert!(shared.access("photos:cat", AccessBits::TEXT).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bootstrap;
pub mod config;
pub mod memory;
pub mod shared;

pub use bootstrap::build_access_control;
pub use memory::{MemAccessor, MemoryError, MemoryStorage};
pub use shared::SharedAccessControl;
