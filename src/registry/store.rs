//! Side table mapping callable origins to their declared error sets.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Weak},
};

use {
    parking_lot::{Mutex, RwLock},
    tracing::debug,
};

use crate::registry::{
    callable::{CallableId, Introspect, OriginToken},
    declare::Raises,
    error_type::{ErrorType, ErrorTypes, ExceptionSet},
};

/// Table size below which dead slots are never swept.
const MIN_PRUNE_THRESHOLD: usize = 64;

/// Process-wide store used by the free-standing entry points.
static GLOBAL_STORE: LazyLock<ExceptionStore> = LazyLock::new(ExceptionStore::new);

/// Declared errors of one callable origin.
#[derive(Debug)]
struct Slot {
    /// Liveness of the owning origin.
    owner: Weak<OriginToken>,
    /// Accumulated error types, locked per callable.
    errors: Mutex<ExceptionSet>,
}

impl Slot {
    fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

#[derive(Debug)]
struct SlotTable {
    slots: HashMap<CallableId, Arc<Slot>>,
    /// Size at which the next insertion sweeps dead slots.
    prune_at: usize,
}

impl Default for SlotTable {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            prune_at: MIN_PRUNE_THRESHOLD,
        }
    }
}

impl SlotTable {
    fn prune(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.is_alive());
        self.prune_at = (self.slots.len() * 2).max(MIN_PRUNE_THRESHOLD);
        before - self.slots.len()
    }
}

/// Registry of declared error sets keyed by callable origin.
///
/// The `ExceptionStore` is a cheap handle: clones share the same table. Slot
/// creation happens under the table's write lock and merging under the slot's
/// own lock, so concurrent declarations on one callable never lose types.
#[derive(Debug, Clone, Default)]
pub struct ExceptionStore {
    table: Arc<RwLock<SlotTable>>,
}

impl ExceptionStore {
    /// Creates an empty store.
    ///
    /// # Returns
    ///
    /// A new `ExceptionStore` instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the process-wide store.
    #[must_use]
    pub fn global() -> &'static ExceptionStore {
        &GLOBAL_STORE
    }

    /// Captures a declaration bound to this store.
    ///
    /// Nothing is recorded until the returned transformer is applied.
    ///
    /// # Arguments
    ///
    /// * `errors` - One error type or a collection of them.
    ///
    /// # Returns
    ///
    /// A reusable `Raises` transformer.
    pub fn declare_errors(&self, errors: impl Into<ErrorTypes>) -> Raises {
        Raises::new(self.clone(), errors.into().into_set())
    }

    /// Merges error types into the slot of a callable, creating it if needed.
    ///
    /// # Arguments
    ///
    /// * `callable` - Callable (or wrapper) whose origin receives the types.
    /// * `errors` - Error types to merge.
    ///
    /// # Returns
    ///
    /// The number of types that were not declared before.
    pub fn merge<C: Introspect + ?Sized>(&self, callable: &C, errors: &ExceptionSet) -> usize {
        let slot = self.slot_for(callable);
        let mut declared = slot.errors.lock();
        let added = declared.union_with(errors);

        debug!(
            callable = %callable.meta().name,
            id = %callable.origin().id(),
            added,
            total = declared.len(),
            "Merged declared errors"
        );

        added
    }

    /// Gets a copy of the errors declared for a callable.
    ///
    /// # Arguments
    ///
    /// * `callable` - Callable or any wrapper around it.
    ///
    /// # Returns
    ///
    /// The declared set, or an empty set if nothing was declared.
    pub fn declared_errors<C: Introspect + ?Sized>(&self, callable: &C) -> ExceptionSet {
        self.table
            .read()
            .slots
            .get(&callable.origin().id())
            .filter(|slot| slot.is_alive())
            .map(|slot| slot.errors.lock().clone())
            .unwrap_or_default()
    }

    /// Checks whether the error type `E` is declared for a callable.
    pub fn declares<E, C>(&self, callable: &C) -> bool
    where
        E: std::error::Error + 'static,
        C: Introspect + ?Sized,
    {
        let error_type = ErrorType::of::<E>();
        self.table
            .read()
            .slots
            .get(&callable.origin().id())
            .is_some_and(|slot| slot.is_alive() && slot.errors.lock().contains(&error_type))
    }

    /// Removes the slots of callables that no longer exist.
    ///
    /// # Returns
    ///
    /// The number of slots removed.
    pub fn prune(&self) -> usize {
        let removed = self.table.write().prune();
        if removed > 0 {
            debug!(removed, "Pruned declared errors of dropped callables");
        }
        removed
    }

    /// Gets the number of live callables with declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table
            .read()
            .slots
            .values()
            .filter(|slot| slot.is_alive())
            .count()
    }

    /// Checks if no live callable has declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_for<C: Introspect + ?Sized>(&self, callable: &C) -> Arc<Slot> {
        let origin = callable.origin();

        if let Some(slot) = self.table.read().slots.get(&origin.id()) {
            return Arc::clone(slot);
        }

        let mut table = self.table.write();
        if table.slots.len() >= table.prune_at {
            table.prune();
        }

        Arc::clone(table.slots.entry(origin.id()).or_insert_with(|| {
            Arc::new(Slot {
                owner: origin.downgrade(),
                errors: Mutex::new(ExceptionSet::new()),
            })
        }))
    }
}
