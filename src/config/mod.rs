//! Project configuration and path exclusion.
//!
//! This module reads the `[tool.pyexc]` section of the project manifest and
//! compiles its exclude patterns.

pub mod exclude;
pub mod settings;

pub use {
    exclude::ExcludeMatcher,
    settings::{DEFAULT_EXCLUDE, MANIFEST_FILE, PyExcConfig, TOOL_SECTION, instance},
};
