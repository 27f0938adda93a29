//! Path exclusion using the configured regular expressions.

use std::path::Path;

use regex::Regex;

use crate::error::domain::ConfigError;

/// Compiled exclude patterns.
///
/// A path is excluded when any pattern matches anywhere in its string form,
/// with `/` as separator on every platform.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    patterns: Vec<Regex>,
}

impl ExcludeMatcher {
    /// Compiles a list of patterns.
    ///
    /// # Arguments
    ///
    /// * `patterns` - Regular expressions, in priority order.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ExcludeMatcher` or a `ConfigError`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` naming the first pattern that
    /// fails to compile.
    pub fn new<'a, I>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|error| ConfigError::invalid_pattern(pattern, error))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Checks whether a path is excluded.
    pub fn is_excluded<P: AsRef<Path>>(&self, path: P) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// Gets the first pattern matching a path.
    ///
    /// # Returns
    ///
    /// The source of the matching pattern, or `None` if the path is included.
    pub fn matching_pattern<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        let path = path.as_ref().to_string_lossy().replace('\\', "/");
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(&path))
            .map(Regex::as_str)
    }

    /// Gets the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Checks if the matcher has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
