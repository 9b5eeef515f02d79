//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────┐
//! │  1. Environment Variables (STAC_*)      │  Runtime override
//! ├─────────────────────────────────────────┤
//! │  2. Project Config (.stac/config.toml)  │  Project-specific
//! ├─────────────────────────────────────────┤
//! │  3. Global Config (~/.stac/config.toml) │  User defaults
//! ├─────────────────────────────────────────┤
//! │  4. Default Values (compile-time)       │  Fallback
//! └─────────────────────────────────────────┘
//! ```
//!
//! The access tree itself is never merged: the highest layer that names
//! a tree wins, matching the facade's wholesale `register`.
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `STAC_DEBUG` | `debug` | bool |
//! | `STAC_TREE_FILE` | `tree.file` | PathBuf |
//!
//! # Example Configuration
//!
//! ```toml
//! # <project>/.stac/config.toml
//! debug = false
//! kinds = ["image", "audio"]
//!
//! [tree]
//! file = "access.toml"
//! ```

mod error;
mod loader;
mod resolver;
mod tree_file;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, LoaderResolver};
pub use tree_file::{load_tree_file, read_raw_tree, resolve_tree};
pub use types::{RawNode, RawTree, StacConfig, TreeSource};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".stac")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".stac";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
