//! Domain-specific error types using `thiserror`.
//!
//! Declaring errors never fails at runtime: misuse of the registry is a type
//! error caught at compile time. The only fallible domain is configuration.

use std::{io::Error as IoError, path::PathBuf, result::Result as StdResult};

use {anyhow::Error, regex::Error as RegexError, thiserror::Error, toml::de::Error as TomlError};

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The manifest could not be read.
    #[error("Failed to read manifest {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    /// The manifest is not valid TOML.
    #[error("Manifest parse error: {0}")]
    ParseError(#[from] TomlError),
    /// An exclude pattern is not a valid regular expression.
    #[error("Invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: RegexError,
    },
}

impl ConfigError {
    /// Creates a new `ReadError` error.
    ///
    /// # Arguments
    ///
    /// * `path` - Manifest path that failed to read.
    /// * `source` - Underlying I/O error.
    ///
    /// # Returns
    ///
    /// A new `ConfigError::ReadError`.
    pub fn read_error(path: impl Into<PathBuf>, source: IoError) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new `InvalidPattern` error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: RegexError) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}

/// Operational error context propagation with `anyhow`.
///
/// This type is used for operational errors that need rich context
/// but don't require specific handling logic.
pub type Result<T> = StdResult<T, Error>;
