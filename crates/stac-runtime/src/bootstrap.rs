//! Facade construction from a resolved [`StacConfig`].

use crate::config::{load_tree_file, resolve_tree, ConfigError, StacConfig, TreeSource};
use stac_auth::{AccessTree, StorageAccessControl, StorageEvents};
use tracing::{debug, info};

/// Builds a facade over `events` as described by `config`.
///
/// Configured kinds are allocated in order, so their bits are stable for a
/// given config. The tree is resolved against the resulting registry; a
/// config without a tree registers an empty one, which denies everything.
///
/// # Errors
///
/// - [`ConfigError::Access`] if a kind is a duplicate or the allocator
///   runs out
/// - tree read, parse or [`ConfigError::UnknownKind`] failures
pub fn build_access_control<E: StorageEvents>(
    config: &StacConfig,
    events: E,
) -> Result<StorageAccessControl<E>, ConfigError> {
    let mut control = StorageAccessControl::new(events);

    for name in &config.kinds {
        let bit = control.add_named_access_type(name)?;
        debug!(kind = %name, bit = bit.bits(), "Registered access kind");
    }

    let tree = match &config.tree {
        Some(TreeSource::File(path)) => load_tree_file(path, control.kinds())?,
        Some(TreeSource::Inline(raw)) => resolve_tree(raw, control.kinds())?,
        None => AccessTree::new(),
    };

    info!(
        kinds = control.kinds().len(),
        leaves = tree.leaf_count(),
        "Access control ready"
    );
    control.register(tree);
    Ok(control)
}
