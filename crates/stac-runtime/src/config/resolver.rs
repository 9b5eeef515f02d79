//! Configuration resolver trait for layered overrides.
//!
//! # Architecture
//!
//! ```text
//! ConfigLoader.load()  →  StacConfig (files + env)
//!                              │
//!                              ▼
//!                  ConfigResolver.resolve()   (e.g. CLI flags on top)
//!                              │
//!                              ▼
//!                      StacConfig (final)
//! ```

use super::{ConfigError, ConfigLoader, StacConfig};
use std::path::{Path, PathBuf};

/// Produces the final configuration for a run.
///
/// Front ends implement this to stack their own overrides (CLI flags,
/// programmatic settings) on top of [`ConfigLoader`].
pub trait ConfigResolver {
    /// Resolves the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any underlying layer fails to load.
    fn resolve(&self) -> Result<StacConfig, ConfigError>;
}

/// Resolver that applies only the file and environment layers.
///
/// Front ends wrap it and stack their own overrides on the result.
#[derive(Debug, Clone, Default)]
pub struct LoaderResolver {
    project_root: Option<PathBuf>,
    global_config: Option<PathBuf>,
    skip_env: bool,
}

impl LoaderResolver {
    /// Creates a resolver for the given project root.
    #[must_use]
    pub fn new(project_root: Option<PathBuf>) -> Self {
        Self {
            project_root,
            ..Self::default()
        }
    }

    /// Reads the global layer from `path` instead of `~/.stac/config.toml`.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config = Some(path.into());
        self
    }

    /// Skips the `STAC_*` environment layer.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Project root, if one was given.
    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    fn loader(&self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        if let Some(ref root) = self.project_root {
            loader = loader.with_project_root(root);
        }
        if let Some(ref path) = self.global_config {
            loader = loader.with_global_config(path);
        }
        if self.skip_env {
            loader = loader.skip_env_vars();
        }
        loader
    }
}

impl ConfigResolver for LoaderResolver {
    fn resolve(&self) -> Result<StacConfig, ConfigError> {
        self.loader().load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn loader_resolver_reads_given_global_config() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global").join("config.toml");
        write(&global, "kinds = [\"image\"]\n");

        let config = LoaderResolver::new(None)
            .with_global_config(&global)
            .skip_env_vars()
            .resolve()
            .unwrap();
        assert_eq!(config.kinds, vec!["image"]);
    }

    #[test]
    fn loader_resolver_layers_project_over_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        write(&global, "kinds = [\"image\"]\n[tree]\nfile = \"/global.toml\"\n");
        let project = temp.path().join("project");
        write(
            &project.join(".stac").join("config.toml"),
            "kinds = [\"audio\"]\n[tree]\nfile = \"/project.toml\"\n",
        );

        let resolver = LoaderResolver::new(Some(project.clone()))
            .with_global_config(&global)
            .skip_env_vars();
        assert_eq!(resolver.project_root(), Some(project.as_path()));

        let config = resolver.resolve().unwrap();
        assert_eq!(config.kinds, vec!["image", "audio"]);
        assert_eq!(
            config.tree,
            Some(crate::config::TreeSource::File(PathBuf::from("/project.toml")))
        );
    }

    #[test]
    fn loader_resolver_surfaces_malformed_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("config.toml");
        write(&global, "debug = \"maybe\"\n");

        let err = LoaderResolver::new(None)
            .with_global_config(&global)
            .skip_env_vars()
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn trait_object_works() {
        let temp = TempDir::new().unwrap();
        let resolver: Box<dyn ConfigResolver> = Box::new(
            LoaderResolver::new(Some(temp.path().to_path_buf()))
                .with_global_config(temp.path().join("absent.toml"))
                .skip_env_vars(),
        );
        assert_eq!(resolver.resolve().unwrap(), StacConfig::default());
    }
}
