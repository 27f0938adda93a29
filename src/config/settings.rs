//! Project configuration read from the `[tool.pyexc]` section of
//! `pyproject.toml`.
//!
//! Configuration problems are never fatal: a missing manifest, a missing or
//! malformed section, and wrong-typed values all fall back to defaults.

use std::{
    fs::read_to_string,
    io::ErrorKind::NotFound,
    path::Path,
    sync::LazyLock,
};

use {
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    toml::{Table, Value},
    tracing::{debug, warn},
};

use crate::{
    config::exclude::ExcludeMatcher,
    error::{domain::ConfigError, operational::ErrorReporter},
};

/// Manifest file looked up in the working directory.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Name of the table under `[tool]` holding the settings.
pub const TOOL_SECTION: &str = "pyexc";

/// Exclude patterns applied when a manifest does not override them.
pub const DEFAULT_EXCLUDE: [&str; 6] = [
    "venv",
    "\\.venv",
    "\\.direnv",
    "tests",
    "\\.git",
    "setup\\.py",
];

/// Process-wide configuration, built on first access.
static INSTANCE: LazyLock<PyExcConfig> = LazyLock::new(PyExcConfig::load);

/// Immutable project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyExcConfig {
    /// Baseline exclude patterns when searching for files to check.
    default_exclude: Vec<String>,
    /// Additional exclude patterns when searching for files to check.
    exclude: Vec<String>,
}

impl Default for PyExcConfig {
    fn default() -> Self {
        Self {
            default_exclude: DEFAULT_EXCLUDE.iter().map(ToString::to_string).collect(),
            exclude: vec![],
        }
    }
}

impl PyExcConfig {
    /// Creates a configuration from explicit pattern lists.
    pub fn new(default_exclude: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            default_exclude,
            exclude,
        }
    }

    /// Parses a configuration from the contents of a `pyproject.toml`.
    ///
    /// Text that is not valid TOML is logged and treated like an empty
    /// manifest.
    ///
    /// # Arguments
    ///
    /// * `text` - Contents of the manifest.
    ///
    /// # Returns
    ///
    /// The parsed `PyExcConfig`, with defaults for everything not set.
    pub fn from_pyproject_toml_str(text: &str) -> Self {
        Self::try_from_pyproject_toml_str(text).unwrap_or_else(|error| {
            ErrorReporter::recovered(&error, "default configuration");
            Self::default()
        })
    }

    /// Parses a configuration, reporting invalid TOML.
    ///
    /// A missing or non-table `tool` or `pyexc` entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if `text` is not valid TOML.
    pub fn try_from_pyproject_toml_str(text: &str) -> Result<Self, ConfigError> {
        let manifest: Table = text.parse()?;

        let section = manifest
            .get("tool")
            .and_then(Value::as_table)
            .and_then(|tools| tools.get(TOOL_SECTION))
            .and_then(Value::as_table);

        Ok(section.map(Self::from_section).unwrap_or_default())
    }

    /// Loads the configuration from a manifest file.
    ///
    /// A missing file silently yields the defaults; any other read failure is
    /// logged and also yields the defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the manifest.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match read_to_string(path) {
            Ok(contents) => {
                debug!("Loading configuration from {:?}", path);
                Self::from_pyproject_toml_str(&contents)
            }
            Err(error) if error.kind() == NotFound => {
                debug!("No manifest at {:?}, using default configuration", path);
                Self::default()
            }
            Err(error) => {
                ErrorReporter::recovered(
                    &ConfigError::read_error(path, error),
                    "default configuration",
                );
                Self::default()
            }
        }
    }

    /// Loads the configuration from a manifest file that must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is not valid TOML.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            read_to_string(path).map_err(|error| ConfigError::read_error(path, error))?;
        Self::try_from_pyproject_toml_str(&contents)
    }

    /// Loads the configuration from `pyproject.toml` in the working directory.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(MANIFEST_FILE)
    }

    /// Gets the baseline exclude patterns.
    #[must_use]
    pub fn default_exclude(&self) -> &[String] {
        &self.default_exclude
    }

    /// Gets the additional exclude patterns.
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Iterates the baseline patterns followed by the additional ones.
    pub fn all_excludes(&self) -> impl Iterator<Item = &str> {
        self.default_exclude
            .iter()
            .chain(&self.exclude)
            .map(String::as_str)
    }

    /// Compiles every exclude pattern into a matcher.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first pattern that is
    /// not a valid regular expression.
    pub fn exclude_matcher(&self) -> Result<ExcludeMatcher, ConfigError> {
        ExcludeMatcher::new(self.all_excludes())
    }

    fn from_section(section: &Table) -> Self {
        let defaults = Self::default();
        Self {
            default_exclude: setting(section, "default_exclude")
                .unwrap_or(defaults.default_exclude),
            exclude: setting(section, "exclude").unwrap_or(defaults.exclude),
        }
    }
}

/// Gets the process-wide configuration.
///
/// Built once from `pyproject.toml` in the working directory on first access
/// and never reloaded.
pub fn instance() -> &'static PyExcConfig {
    &INSTANCE
}

/// Reads a typed setting, treating a wrong-typed value as absent.
fn setting<T: DeserializeOwned>(section: &Table, key: &str) -> Option<T> {
    let value = section.get(key)?.clone();
    match value.try_into() {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!(key = key, error = %error, "Ignoring wrong-typed setting");
            None
        }
    }
}
