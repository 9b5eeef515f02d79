//! Configuration errors.

use stac_auth::StorageAccessError;
use stac_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config or tree file.
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse TOML file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to parse JSON.
    #[error("failed to parse JSON file '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// A tree leaf names a kind nobody defined.
    #[error("unknown access kind '{kind}' at '{path}'")]
    UnknownKind { kind: String, path: String },

    /// Defining the configured kinds failed.
    #[error(transparent)]
    Access(#[from] StorageAccessError),
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse JSON error.
    pub fn parse_json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ParseJson {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FILE",
            Self::ParseToml { .. } => "CONFIG_PARSE_TOML",
            Self::ParseJson { .. } => "CONFIG_PARSE_JSON",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
            Self::UnknownKind { .. } => "CONFIG_UNKNOWN_KIND",
            Self::Access(_) => "CONFIG_KIND_ALLOCATION",
        }
    }

    fn is_recoverable(&self) -> bool {
        // The user can fix the file or the variable and retry.
        !matches!(self, Self::Access(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stac_types::assert_error_code;

    #[test]
    fn env_var_display() {
        let err = ConfigError::invalid_env_var("STAC_DEBUG", "expected bool");
        assert!(err.to_string().contains("STAC_DEBUG"));
        assert!(err.to_string().contains("expected bool"));
        assert_error_code(&err, "CONFIG_");
    }

    #[test]
    fn unknown_kind_display() {
        let err = ConfigError::UnknownKind {
            kind: "VIDEO".to_string(),
            path: "media:clip".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("VIDEO"), "got: {msg}");
        assert!(msg.contains("media:clip"), "got: {msg}");
        assert_error_code(&err, "CONFIG_");
        assert!(err.is_recoverable());
    }

    #[test]
    fn access_error_is_transparent() {
        let err = ConfigError::from(StorageAccessError::DuplicateKind {
            name: "IMAGE".to_string(),
        });
        assert!(err.to_string().contains("IMAGE"));
        assert_eq!(err.code(), "CONFIG_KIND_ALLOCATION");
        assert!(!err.is_recoverable());
    }
}
