//! Config store errors.

use std::path::PathBuf;

/// Failure to load or write a config store.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file is not valid TOML or holds non-constant values.
    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The store could not be rendered back to TOML.
    #[error("cannot serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No file exists at the given path.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A constant name that no runtime could publish.
    #[error("invalid constant name {name:?}: names are non-empty and contain no whitespace")]
    InvalidName { name: String },
}

/// Result type for config store operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
