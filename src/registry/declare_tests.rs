//! Behavioral tests for declarations and the `Declared` proxy.
//!
//! These tests cover accumulation, isolation, identity convergence across
//! wrapper layers, and transparent forwarding of results and errors.

#[cfg(test)]
mod tests {
    use std::{
        error::Error as StdError,
        fmt::{Display, Formatter, Result as FmtResult},
        io::{Error as IoError, ErrorKind},
        num::ParseIntError,
        sync::atomic::{AtomicUsize, Ordering::SeqCst},
        thread::scope,
    };

    use thiserror::Error;

    use crate::registry::{
        callable::{Callable, Function, Introspect, Param},
        declare::{declare_errors, declared_errors},
        error_type::{ErrorType, ExceptionSet},
        store::ExceptionStore,
    };

    #[derive(Error, Debug, PartialEq)]
    #[error("value out of range: {0}")]
    struct RangeError(i64);

    #[derive(Error, Debug)]
    #[error("lookup failed for {key}")]
    struct LookupError {
        key: String,
        #[source]
        cause: IoError,
    }

    #[derive(Debug)]
    struct Numbered<const N: usize>;

    impl<const N: usize> Display for Numbered<N> {
        fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
            write!(f, "numbered error {N}")
        }
    }

    impl<const N: usize> StdError for Numbered<N> {}

    fn checked_double(x: i64) -> Result<i64, RangeError> {
        if x.abs() > 1000 {
            Err(RangeError(x))
        } else {
            Ok(x * 2)
        }
    }

    #[test]
    fn test_undeclared_callable_yields_empty_set() {
        let f = Function::new("never_declared", |(): ()| 1);
        assert!(declared_errors(&f).is_empty());
    }

    #[test]
    fn test_wrapper_and_original_share_declared_set() {
        let f = Function::new("double", checked_double);
        let wrap = declare_errors(ErrorType::of::<RangeError>());
        let g = wrap.apply(f.clone());

        let expected = ExceptionSet::from_iter([ErrorType::of::<RangeError>()]);
        assert_eq!(declared_errors(&g), expected);
        assert_eq!(declared_errors(&f), expected);
    }

    #[test]
    fn test_successive_declarations_union() {
        let store = ExceptionStore::new();
        let f = Function::new("read_config", |(): ()| ());

        let first = [ErrorType::of::<IoError>(), ErrorType::of::<ParseIntError>()];
        let second = [ErrorType::of::<ParseIntError>(), ErrorType::of::<RangeError>()];

        let g = store.declare_errors(first).apply(f.clone());
        let _h = store.declare_errors(second).apply(f.clone());

        let expected: ExceptionSet = first.into_iter().chain(second).collect();
        assert_eq!(store.declared_errors(&f), expected);
        assert_eq!(store.declared_errors(&g), expected);
        assert_eq!(expected.len(), 3);
    }

    #[test]
    fn test_redeclaring_is_idempotent() {
        let store = ExceptionStore::new();
        let once = Function::new("once", |(): ()| ());
        let twice = Function::new("twice", |(): ()| ());

        let raises = store.declare_errors(ErrorType::of::<IoError>());
        raises.apply(&once);
        raises.apply(&twice);
        raises.apply(&twice);
        store
            .declare_errors([ErrorType::of::<IoError>(), ErrorType::of::<IoError>()])
            .apply(&twice);

        assert_eq!(
            store.declared_errors(&once).len(),
            store.declared_errors(&twice).len()
        );
        assert_eq!(store.declared_errors(&twice).len(), 1);
    }

    #[test]
    fn test_declarations_are_isolated() {
        let store = ExceptionStore::new();
        let declared = Function::new("declared", |(): ()| ());
        let unrelated = Function::new("declared", |(): ()| ());

        store
            .declare_errors(ErrorType::of::<RangeError>())
            .apply(&declared);

        assert!(store.declares::<RangeError, _>(&declared));
        assert!(store.declared_errors(&unrelated).is_empty());
    }

    #[test]
    fn test_transformer_is_reusable() {
        let store = ExceptionStore::new();
        let raises = store.declare_errors(vec![ErrorType::of::<IoError>()]);
        assert!(raises.errors().contains_type::<IoError>());

        let first = raises.apply(Function::new("first", |(): ()| ()));
        let second = raises.apply(Function::new("second", |(): ()| ()));
        store
            .declare_errors(ErrorType::of::<RangeError>())
            .apply(first.inner());

        assert_eq!(store.declared_errors(&first).len(), 2);
        assert_eq!(store.declared_errors(&second).len(), 1);
    }

    #[test]
    fn test_rewrapping_converges_on_origin() {
        let store = ExceptionStore::new();
        let f = Function::new("parse", |text: &str| text.parse::<i64>());

        let inner = store
            .declare_errors(ErrorType::of::<ParseIntError>())
            .apply(f.clone());
        let outer = store
            .declare_errors(ErrorType::of::<RangeError>())
            .apply(inner);

        let expected =
            ExceptionSet::from_iter([ErrorType::of::<ParseIntError>(), ErrorType::of::<RangeError>()]);
        assert_eq!(store.declared_errors(&outer), expected);
        assert_eq!(store.declared_errors(outer.inner()), expected);
        assert_eq!(store.declared_errors(&f), expected);
        assert_eq!(store.len(), 1);
        assert_eq!(outer.call("7"), Ok(7));
    }

    #[test]
    fn test_wrapper_preserves_metadata() {
        let f = Function::new("double", checked_double)
            .with_doc("Doubles a bounded integer.")
            .with_params([Param::positional("x")]);
        let g = ExceptionStore::new()
            .declare_errors(ErrorType::of::<RangeError>())
            .apply(f.clone());

        assert_eq!(g.meta(), f.meta());
        assert_eq!(g.meta().signature(), "double(x)");
        assert_eq!(g.origin(), f.origin());
    }

    #[test]
    fn test_wrapper_forwards_results_and_errors() {
        let f = Function::new("double", checked_double);
        let g = ExceptionStore::new()
            .declare_errors(ErrorType::of::<RangeError>())
            .apply(f.clone());

        for x in [0, 21, -500, 1001, -5000] {
            assert_eq!(g.call(x), f.call(x));
        }

        let error = g.call(2000).unwrap_err();
        assert_eq!(error, RangeError(2000));
        assert_eq!(error.to_string(), "value out of range: 2000");
    }

    #[test]
    fn test_wrapper_preserves_error_chain() {
        let lookup = Function::new("lookup", |key: &str| -> Result<String, LookupError> {
            Err(LookupError {
                key: key.to_string(),
                cause: IoError::new(ErrorKind::NotFound, "no such entry"),
            })
        });
        let g = ExceptionStore::new()
            .declare_errors(ErrorType::of::<LookupError>())
            .apply(lookup);

        let error = g.call("user").unwrap_err();
        assert_eq!(error.key, "user");
        assert_eq!(error.to_string(), "lookup failed for user");

        let source = error.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "no such entry");
        assert_eq!(error.cause.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_wrapper_preserves_side_effects() {
        let calls = AtomicUsize::new(0);
        let f = Function::new("count", |step: usize| calls.fetch_add(step, SeqCst) + step);
        let g = ExceptionStore::new()
            .declare_errors(ErrorType::of::<IoError>())
            .apply(&f);

        assert_eq!(g.call(2), 2);
        assert_eq!(f.call(3), 5);
        assert_eq!(g.call(1), 6);
        assert_eq!(calls.load(SeqCst), 6);
    }

    #[test]
    fn test_nothing_recorded_before_apply() {
        let store = ExceptionStore::new();
        let _raises = store.declare_errors(ErrorType::of::<IoError>());
        assert!(store.is_empty());

        let f = Function::new("empty", |(): ()| ());
        let g = store.declare_errors(Vec::<ErrorType>::new()).apply(&f);
        assert!(store.declared_errors(&g).is_empty());
    }

    #[test]
    fn test_concurrent_declarations_on_one_callable() {
        let store = ExceptionStore::new();
        let f = Function::new("shared", |(): ()| ());
        let types = [
            ErrorType::of::<Numbered<0>>(),
            ErrorType::of::<Numbered<1>>(),
            ErrorType::of::<Numbered<2>>(),
            ErrorType::of::<Numbered<3>>(),
            ErrorType::of::<Numbered<4>>(),
            ErrorType::of::<Numbered<5>>(),
            ErrorType::of::<Numbered<6>>(),
            ErrorType::of::<Numbered<7>>(),
        ];

        scope(|s| {
            for error_type in types {
                let store = &store;
                let f = &f;
                s.spawn(move || {
                    for _ in 0..100 {
                        store.declare_errors(error_type).apply(f);
                    }
                });
            }
        });

        let declared = store.declared_errors(&f);
        assert_eq!(declared, types.into_iter().collect::<ExceptionSet>());
        assert_eq!(store.len(), 1);
    }
}
