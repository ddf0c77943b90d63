//! Error types for table construction and configuration loading.

use thiserror::Error;

/// Errors raised while building a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two entries share the same key, which would make exact lookup ambiguous.
    #[error("duplicate {table} entry: {key}")]
    DuplicateEntry { table: &'static str, key: String },
    /// An entry with an empty key can never be matched.
    #[error("empty key in {table} table")]
    EmptyKey { table: &'static str },
}

/// Errors that can occur when loading assistant configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// A table described by the configuration is malformed.
    #[error("invalid table in config: {0}")]
    Table(#[from] TableError),
    /// A configuration value was invalid.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
