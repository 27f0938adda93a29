//! Callable identity, descriptive metadata and invocation traits.
//!
//! Every original callable mints an `Origin` when it is created. Wrappers
//! layered on top report the origin of the callable they wrap, so all of them
//! resolve to the same identity.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    rc::Rc,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering::Relaxed},
    },
};

use serde::{Deserialize, Serialize};

/// Source of process-unique callable identifiers.
static NEXT_CALLABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of an original callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallableId(u64);

impl CallableId {
    /// Gets the raw identifier value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for CallableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Liveness token shared by every handle of one original callable.
#[derive(Debug)]
pub(crate) struct OriginToken {
    id: CallableId,
}

/// Stable identity of an original callable.
///
/// Cloning an `Origin` shares the identity. Stores only ever keep a weak
/// reference, so the identity dies with the last handle.
#[derive(Debug, Clone)]
pub struct Origin {
    token: Arc<OriginToken>,
}

impl Origin {
    /// Mints a fresh identity.
    ///
    /// # Returns
    ///
    /// A new `Origin` distinct from every other origin of the process.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: Arc::new(OriginToken {
                id: CallableId(NEXT_CALLABLE_ID.fetch_add(1, Relaxed)),
            }),
        }
    }

    /// Gets the identifier of this origin.
    #[must_use]
    pub fn id(&self) -> CallableId {
        self.token.id
    }

    /// Creates a weak liveness handle for store slots.
    pub(crate) fn downgrade(&self) -> Weak<OriginToken> {
        Arc::downgrade(&self.token)
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Origin {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Origin {}

/// Kind of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Plain positional parameter.
    Positional,
    /// Keyword parameter.
    Keyword,
    /// Variadic positional parameters (`*args`).
    VarPositional,
    /// Variadic keyword parameters (`**kwargs`).
    VarKeyword,
}

/// A single parameter of a callable signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter kind.
    pub kind: ParamKind,
}

impl Param {
    /// Creates a positional parameter.
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Positional,
        }
    }

    /// Creates a keyword parameter.
    pub fn keyword(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Keyword,
        }
    }

    /// Creates a variadic positional parameter.
    pub fn var_positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::VarPositional,
        }
    }

    /// Creates a variadic keyword parameter.
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::VarKeyword,
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            ParamKind::Positional | ParamKind::Keyword => f.write_str(&self.name),
            ParamKind::VarPositional => write!(f, "*{}", self.name),
            ParamKind::VarKeyword => write!(f, "**{}", self.name),
        }
    }
}

/// Descriptive metadata used for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableMeta {
    /// Callable name.
    pub name: String,
    /// Documentation string (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Ordered parameter list.
    pub params: Vec<Param>,
}

impl CallableMeta {
    /// Creates metadata with a name and nothing else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    /// Renders the signature as `name(a, b, *args, **kwargs)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// Identity and metadata of something that can carry declared errors.
pub trait Introspect {
    /// Gets the stable identity of the underlying original callable.
    fn origin(&self) -> &Origin;

    /// Gets the descriptive metadata exposed to introspection.
    fn meta(&self) -> &CallableMeta;
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn origin(&self) -> &Origin {
        (**self).origin()
    }

    fn meta(&self) -> &CallableMeta {
        (**self).meta()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn origin(&self) -> &Origin {
        (**self).origin()
    }

    fn meta(&self) -> &CallableMeta {
        (**self).meta()
    }
}

impl<T: Introspect + ?Sized> Introspect for Arc<T> {
    fn origin(&self) -> &Origin {
        (**self).origin()
    }

    fn meta(&self) -> &CallableMeta {
        (**self).meta()
    }
}

impl<T: Introspect + ?Sized> Introspect for Rc<T> {
    fn origin(&self) -> &Origin {
        (**self).origin()
    }

    fn meta(&self) -> &CallableMeta {
        (**self).meta()
    }
}

/// Invocation of a callable with an argument bundle.
///
/// Callables taking several arguments receive them as a tuple.
pub trait Callable<Args>: Introspect {
    /// Value returned by the callable, including any `Result` it yields.
    type Output;

    /// Invokes the callable.
    fn call(&self, args: Args) -> Self::Output;
}

impl<Args, T: Callable<Args> + ?Sized> Callable<Args> for &T {
    type Output = T::Output;

    fn call(&self, args: Args) -> Self::Output {
        (**self).call(args)
    }
}

impl<Args, T: Callable<Args> + ?Sized> Callable<Args> for Arc<T> {
    type Output = T::Output;

    fn call(&self, args: Args) -> Self::Output {
        (**self).call(args)
    }
}

/// An original callable: a Rust closure or function paired with its identity
/// and metadata.
///
/// Clones share the identity.
#[derive(Clone)]
pub struct Function<F> {
    origin: Origin,
    meta: CallableMeta,
    f: F,
}

impl<F> Function<F> {
    /// Creates a named callable with a fresh identity.
    ///
    /// # Arguments
    ///
    /// * `name` - Name exposed to introspection.
    /// * `f` - Body of the callable.
    ///
    /// # Returns
    ///
    /// A new `Function`.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            origin: Origin::new(),
            meta: CallableMeta::named(name),
            f,
        }
    }

    /// Sets the documentation string.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.meta.doc = Some(doc.into());
        self
    }

    /// Sets the parameter list.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.meta.params = params.into_iter().collect();
        self
    }
}

impl<F> Introspect for Function<F> {
    fn origin(&self) -> &Origin {
        &self.origin
    }

    fn meta(&self) -> &CallableMeta {
        &self.meta
    }
}

impl<Args, R, F: Fn(Args) -> R> Callable<Args> for Function<F> {
    type Output = R;

    fn call(&self, args: Args) -> R {
        (self.f)(args)
    }
}

impl<F> Debug for Function<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Function")
            .field("id", &self.origin.id())
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
