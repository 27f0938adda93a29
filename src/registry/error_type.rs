//! Error type identifiers and the sets built from them.
//!
//! An `ErrorType` names an error kind by its `TypeId`. The readable type name
//! travels along for display but never takes part in comparisons.

use std::{
    any::{TypeId, type_name},
    cmp::Ordering,
    collections::{
        HashSet,
        hash_set::{IntoIter, Iter},
    },
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
};

/// Identifier for an error kind (a type reference, never an instance).
#[derive(Debug, Clone, Copy)]
pub struct ErrorType {
    /// Type identity.
    id: TypeId,
    /// Fully qualified type name, for display only.
    name: &'static str,
}

impl ErrorType {
    /// Creates the identifier for error type `E`.
    ///
    /// # Returns
    ///
    /// A new `ErrorType` identifying `E`.
    #[must_use]
    pub fn of<E: StdError + 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }

    /// Gets the fully qualified name of the error type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the last path segment of the type name (`ParseIntError` for
    /// `core::num::error::ParseIntError`).
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Checks whether this identifier names the error type `E`.
    #[must_use]
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.id == TypeId::of::<E>()
    }
}

impl PartialEq for ErrorType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ErrorType {}

impl Hash for ErrorType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ErrorType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name)
    }
}

/// Set of error types declared against one callable.
///
/// Unique by type identity, unordered. `sorted` gives a deterministic
/// rendering for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    types: HashSet<ErrorType>,
}

impl ExceptionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an error type.
    ///
    /// # Returns
    ///
    /// `true` if the type was not already present.
    pub fn insert(&mut self, error_type: ErrorType) -> bool {
        self.types.insert(error_type)
    }

    /// Merges every type of `other` into this set.
    ///
    /// # Returns
    ///
    /// The number of types that were newly added.
    pub fn union_with(&mut self, other: &ExceptionSet) -> usize {
        let before = self.types.len();
        self.types.extend(other.types.iter().copied());
        self.types.len() - before
    }

    /// Checks membership of an error type.
    #[must_use]
    pub fn contains(&self, error_type: &ErrorType) -> bool {
        self.types.contains(error_type)
    }

    /// Checks membership of the error type `E`.
    #[must_use]
    pub fn contains_type<E: StdError + 'static>(&self) -> bool {
        self.contains(&ErrorType::of::<E>())
    }

    /// Checks whether every type of this set is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &ExceptionSet) -> bool {
        self.types.is_subset(&other.types)
    }

    /// Gets the number of distinct error types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Checks if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates the error types in arbitrary order.
    pub fn iter(&self) -> Iter<'_, ErrorType> {
        self.types.iter()
    }

    /// Gets the error types ordered by name.
    #[must_use]
    pub fn sorted(&self) -> Vec<ErrorType> {
        let mut types: Vec<ErrorType> = self.types.iter().copied().collect();
        types.sort();
        types
    }
}

impl FromIterator<ErrorType> for ExceptionSet {
    fn from_iter<I: IntoIterator<Item = ErrorType>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

impl Extend<ErrorType> for ExceptionSet {
    fn extend<I: IntoIterator<Item = ErrorType>>(&mut self, iter: I) {
        self.types.extend(iter);
    }
}

impl IntoIterator for ExceptionSet {
    type Item = ErrorType;
    type IntoIter = IntoIter<ErrorType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExceptionSet {
    type Item = &'a ErrorType;
    type IntoIter = Iter<'a, ErrorType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

impl Display for ExceptionSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("{")?;
        for (index, error_type) in self.sorted().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(error_type.short_name())?;
        }
        f.write_str("}")
    }
}

/// Argument of the registration entry point: one error type or many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorTypes {
    /// A single error type.
    One(ErrorType),
    /// A collection of error types; duplicates and order are irrelevant.
    Many(Vec<ErrorType>),
}

impl ErrorTypes {
    /// Normalizes the declaration to a set.
    #[must_use]
    pub fn into_set(self) -> ExceptionSet {
        match self {
            Self::One(error_type) => ExceptionSet::from_iter([error_type]),
            Self::Many(types) => types.into_iter().collect(),
        }
    }
}

impl From<ErrorType> for ErrorTypes {
    fn from(error_type: ErrorType) -> Self {
        Self::One(error_type)
    }
}

impl From<Vec<ErrorType>> for ErrorTypes {
    fn from(types: Vec<ErrorType>) -> Self {
        Self::Many(types)
    }
}

impl<const N: usize> From<[ErrorType; N]> for ErrorTypes {
    fn from(types: [ErrorType; N]) -> Self {
        Self::Many(types.to_vec())
    }
}

impl From<&[ErrorType]> for ErrorTypes {
    fn from(types: &[ErrorType]) -> Self {
        Self::Many(types.to_vec())
    }
}

impl From<ExceptionSet> for ErrorTypes {
    fn from(set: ExceptionSet) -> Self {
        Self::Many(set.into_iter().collect())
    }
}

impl From<HashSet<ErrorType>> for ErrorTypes {
    fn from(set: HashSet<ErrorType>) -> Self {
        Self::Many(set.into_iter().collect())
    }
}

impl FromIterator<ErrorType> for ErrorTypes {
    fn from_iter<I: IntoIterator<Item = ErrorType>>(iter: I) -> Self {
        Self::Many(iter.into_iter().collect())
    }
}
