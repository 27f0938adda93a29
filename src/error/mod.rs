//! Error handling using `thiserror` and `anyhow`.
//!
//! This module provides domain-specific error types for precise error
//! handling and operational error context propagation for the command line.

pub mod domain;
pub mod operational;

pub use {
    domain::{ConfigError, Result},
    operational::{ErrorReporter, ResultExt},
};
