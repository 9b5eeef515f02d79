//! Access tree authoring.
//!
//! Turns a [`RawTree`] (names allowed) into an [`AccessTree`] (bits only)
//! using an [`AccessKinds`] registry, and reads raw trees from TOML or
//! JSON files.
//!
//! ```toml
//! # access.toml
//! [profile]
//! avatar = ["BINARY", "JSON"]
//! notes = "TEXT"
//!
//! [profile."*"]
//! "**/*" = "ANY"
//! ```

use super::{ConfigError, RawNode, RawTree};
use stac_auth::{AccessBits, AccessKinds, AccessTree, Node};
use stac_types::identifier;
use std::path::Path;
use tracing::debug;

/// Resolves kind names in `raw` against `kinds`.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownKind`] for the first unrecognised name,
/// with the identifier of the leaf that used it.
pub fn resolve_tree(raw: &RawTree, kinds: &AccessKinds) -> Result<AccessTree, ConfigError> {
    resolve_level(raw, kinds, &mut Vec::new())
}

fn resolve_level<'a>(
    raw: &'a RawTree,
    kinds: &AccessKinds,
    path: &mut Vec<&'a str>,
) -> Result<AccessTree, ConfigError> {
    let mut tree = AccessTree::new();

    for (name, node) in raw {
        path.push(name.as_str());
        let resolved = match node {
            RawNode::Bits(bits) => Node::Leaf(AccessBits::from_bits_retain(*bits)),
            RawNode::Name(kind) => Node::Leaf(lookup(kinds, kind, path)?),
            RawNode::Names(list) => {
                let (bits, unknown) = kinds.parse_list(list);
                if let Some(kind) = unknown.first() {
                    return Err(unknown_kind(kind, path));
                }
                Node::Leaf(bits)
            }
            RawNode::Directory(sub) => Node::Directory(resolve_level(sub, kinds, path)?),
        };
        path.pop();
        tree.insert(name.clone(), resolved);
    }

    Ok(tree)
}

fn lookup(kinds: &AccessKinds, kind: &str, path: &[&str]) -> Result<AccessBits, ConfigError> {
    kinds.lookup(kind).ok_or_else(|| unknown_kind(kind, path))
}

fn unknown_kind(kind: &str, path: &[&str]) -> ConfigError {
    ConfigError::UnknownKind {
        kind: kind.to_string(),
        path: identifier::join(path),
    }
}

/// Parses a raw tree from `path`.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn read_raw_tree(path: &Path) -> Result<RawTree, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let raw = if is_json {
        serde_json::from_str(&content).map_err(|e| ConfigError::parse_json(path, e))?
    } else {
        toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))?
    };

    debug!(path = %path.display(), json = is_json, "Read access tree file");
    Ok(raw)
}

/// Reads and resolves a tree file in one step.
///
/// # Errors
///
/// Returns [`ConfigError`] on read, parse or kind resolution failure.
pub fn load_tree_file(path: &Path, kinds: &AccessKinds) -> Result<AccessTree, ConfigError> {
    let raw = read_raw_tree(path)?;
    resolve_tree(&raw, kinds)
}
