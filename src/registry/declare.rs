//! Error declarations and the identity-preserving wrapper they produce.
//!
//! Declaring happens in two stages: `declare_errors` captures the error
//! types, and `Raises::apply` records them against a callable and hands back
//! a `Declared` proxy.
//!
//! ```
//! use std::num::ParseIntError;
//!
//! use pyexc::{Callable, ErrorType, Function, declare_errors, declared_errors};
//!
//! let parse = declare_errors(ErrorType::of::<ParseIntError>())
//!     .apply(Function::new("parse", |text: &str| text.parse::<i64>()));
//!
//! assert_eq!(parse.call("42"), Ok(42));
//! assert!(declared_errors(&parse).contains_type::<ParseIntError>());
//! ```

use crate::registry::{
    callable::{Callable, CallableMeta, Introspect, Origin},
    error_type::{ErrorTypes, ExceptionSet},
    store::ExceptionStore,
};

/// A captured declaration, ready to be applied to any number of callables.
#[derive(Debug, Clone)]
pub struct Raises {
    store: ExceptionStore,
    errors: ExceptionSet,
}

impl Raises {
    pub(crate) fn new(store: ExceptionStore, errors: ExceptionSet) -> Self {
        Self { store, errors }
    }

    /// Gets the normalized set of error types this declaration carries.
    #[must_use]
    pub fn errors(&self) -> &ExceptionSet {
        &self.errors
    }

    /// Records the declaration against a callable and wraps it.
    ///
    /// Wrapping a `Declared` proxy again merges into the same set as the
    /// original, because every layer reports the original's origin.
    ///
    /// # Arguments
    ///
    /// * `callable` - Original callable or an existing wrapper.
    ///
    /// # Returns
    ///
    /// A `Declared` proxy that behaves exactly like `callable`.
    pub fn apply<C: Introspect>(&self, callable: C) -> Declared<C> {
        self.store.merge(&callable, &self.errors);
        Declared { inner: callable }
    }
}

/// Transparent proxy around a callable with declared errors.
///
/// Calls are forwarded untouched: the result, including any error value, comes
/// back exactly as the wrapped callable produced it. Name, documentation and
/// parameters are those of the wrapped callable.
#[derive(Debug, Clone)]
pub struct Declared<C> {
    inner: C,
}

impl<C> Declared<C> {
    /// Gets the wrapped callable.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Unwraps the proxy. Declarations stay recorded for the origin.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Introspect> Introspect for Declared<C> {
    fn origin(&self) -> &Origin {
        self.inner.origin()
    }

    fn meta(&self) -> &CallableMeta {
        self.inner.meta()
    }
}

impl<Args, C: Callable<Args>> Callable<Args> for Declared<C> {
    type Output = C::Output;

    fn call(&self, args: Args) -> Self::Output {
        self.inner.call(args)
    }
}

/// Captures a declaration against the process-wide store.
///
/// # Arguments
///
/// * `errors` - One error type or a collection of them.
///
/// # Returns
///
/// A reusable `Raises` transformer; nothing is recorded until it is applied.
pub fn declare_errors(errors: impl Into<ErrorTypes>) -> Raises {
    ExceptionStore::global().declare_errors(errors)
}

/// Gets a copy of the errors declared for a callable in the process-wide store.
///
/// Never fails: callables without declarations yield an empty set.
pub fn declared_errors<C: Introspect + ?Sized>(callable: &C) -> ExceptionSet {
    ExceptionStore::global().declared_errors(callable)
}
