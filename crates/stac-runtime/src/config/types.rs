//! Configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration.
///
/// Every field has a default, so partial files are valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StacConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Extra access kinds, allocated in order after the built-ins.
    pub kinds: Vec<String>,

    /// Where the access tree comes from.
    pub tree: Option<TreeSource>,
}

impl StacConfig {
    /// Merges another config into this one.
    ///
    /// `debug` is taken when it differs from the default, `kinds` are
    /// appended when not already listed, and `tree` replaces the current
    /// source wholesale.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        for kind in &other.kinds {
            if !self.kinds.iter().any(|k| k.eq_ignore_ascii_case(kind)) {
                self.kinds.push(kind.clone());
            }
        }

        if other.tree.is_some() {
            self.tree.clone_from(&other.tree);
        }
    }

    /// Serializes to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// Source of the access tree.
///
/// ```toml
/// [tree]
/// file = "access.toml"
/// ```
///
/// or
///
/// ```toml
/// [tree.inline.profile]
/// avatar = ["BINARY", "JSON"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeSource {
    /// TOML or JSON tree file (by extension).
    File(PathBuf),
    /// Tree written directly in the config.
    Inline(RawTree),
}

/// Tree as authored, before kind names are resolved.
pub type RawTree = BTreeMap<String, RawNode>;

/// Tree entry as authored.
///
/// Leaves may be written as an integer mask, a single kind name, or a
/// list of kind names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNode {
    /// Raw integer mask, e.g. `3`.
    Bits(u32),
    /// One kind name, e.g. `"TEXT"`.
    Name(String),
    /// Several kind names OR-ed together, e.g. `["BINARY", "JSON"]`.
    Names(Vec<String>),
    /// Nested level.
    Directory(RawTree),
}
