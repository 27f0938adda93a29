//! pyexc - declared-error registry
//!
//! Lets authors declare, per callable, the error types it may produce, and
//! lets a later analysis pass read those declarations back. Declarations are
//! kept in a side table keyed by the identity of the original callable, and
//! the callable itself is wrapped in a proxy that behaves exactly like it.
//!
//! Project-level settings (exclude patterns) come from the `[tool.pyexc]`
//! section of `pyproject.toml`.

pub mod config;
pub mod error;
pub mod registry;

// Re-export key types for convenience
pub use {
    config::{ExcludeMatcher, PyExcConfig},
    error::ConfigError,
    registry::{
        Callable, CallableId, CallableMeta, Declared, ErrorType, ErrorTypes, ExceptionSet,
        ExceptionStore, Function, Introspect, Origin, Param, ParamKind, Raises, declare_errors,
        declared_errors,
    },
};
