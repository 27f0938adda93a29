//! Declared-error registry.
//!
//! This module attaches sets of error types to callables through an explicit
//! side table, and wraps the callables in proxies that keep their behavior
//! and metadata intact.

pub mod callable;
pub mod declare;
mod declare_tests;
pub mod error_type;
pub mod store;

pub use {
    callable::{Callable, CallableId, CallableMeta, Function, Introspect, Origin, Param, ParamKind},
    declare::{Declared, Raises, declare_errors, declared_errors},
    error_type::{ErrorType, ErrorTypes, ExceptionSet},
    store::ExceptionStore,
};
