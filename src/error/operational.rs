//! Operational error context propagation with `anyhow`.
//!
//! This module provides the context extension trait used by the command line
//! and the reporter that logs errors which were recovered instead of raised.

use std::{error::Error as StdError, fmt::Display};

use {
    anyhow::{Context, Error, Result as AnyhowResult},
    tracing::{error, warn},
};

/// Extension trait for enhanced error context.
pub trait ResultExt<T, E> {
    /// Adds context to an error with a static string.
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;

    /// Adds context to an error with a formatted string.
    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(context)
    }

    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(format.to_string())
    }
}

/// Centralized error logging.
pub struct ErrorReporter;

impl ErrorReporter {
    /// Logs an error that was recovered by falling back to a default.
    ///
    /// # Arguments
    ///
    /// * `error` - The recovered error.
    /// * `fallback` - What was used instead.
    pub fn recovered(error: &(dyn StdError + 'static), fallback: &str) {
        warn!(fallback = fallback, error = %Self::chain_message(error), "Recovered error");
    }

    /// Logs an error that ends the current operation.
    pub fn fatal(error: &Error) {
        error!(error = %Self::to_user_message(error), "Operation failed");
    }

    /// Converts an error and its causes to a single line.
    ///
    /// Causes are appended in order, separated by `": "`.
    pub fn to_user_message(error: &Error) -> String {
        Self::chain_message(&**error)
    }

    fn chain_message(error: &(dyn StdError + 'static)) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            let cause_message = cause.to_string();
            if !message.ends_with(&cause_message) {
                message.push_str(": ");
                message.push_str(&cause_message);
            }
            source = cause.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind::NotFound};

    use anyhow::anyhow;

    use crate::error::{
        domain::ConfigError,
        operational::{ErrorReporter, ResultExt},
    };

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<i32, Error> = Err(Error::new(NotFound, "missing"));
        let error = result.add_context("Loading manifest").unwrap_err();

        assert_eq!(error.to_string(), "Loading manifest");
        assert_eq!(error.root_cause().to_string(), "missing");
    }

    #[test]
    fn test_result_ext_with_contextf() {
        let result: Result<i32, Error> = Err(Error::new(NotFound, "missing"));
        let error = result
            .add_contextf(format_args!("Reading {}", "pyproject.toml"))
            .unwrap_err();

        assert_eq!(error.to_string(), "Reading pyproject.toml");
    }

    #[test]
    fn test_user_message_includes_causes() {
        let result: Result<(), ConfigError> = Err(ConfigError::read_error(
            "pyproject.toml",
            Error::new(NotFound, "gone"),
        ));
        let error = result.add_context("Loading configuration").unwrap_err();

        assert_eq!(
            ErrorReporter::to_user_message(&error),
            "Loading configuration: Failed to read manifest \"pyproject.toml\": gone"
        );
        assert_eq!(ErrorReporter::to_user_message(&anyhow!("plain")), "plain");
    }
}
