use crate::error::{StoreError, StoreResult};
use crate::store::{Action, Store};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

type Factory<D> = Box<dyn Fn() -> D + Send + Sync>;

/// Registry that allocates, resolves and frees [`Store`]s by identifier.
///
/// Identifiers are the decimal strings `"1"`, `"2"`, ... in allocation
/// order. The counter never goes back, so an id is never handed out twice by
/// the same manager, even after its store was freed.
///
/// There is no global instance. Create one per application, module or test
/// and share it however the host sees fit (an `Arc` works, all methods take
/// `&self`).
///
/// # Examples
///
/// ```
/// use handoff::{Action, StoreError, StoreManager};
///
/// #[derive(Clone, Default)]
/// struct Counter {
///     count: u32,
/// }
///
/// struct Inc;
///
/// impl Action for Inc {
///     type Kind = ();
///     fn kind(&self) {}
/// }
///
/// let manager: StoreManager<Counter, Inc> = StoreManager::new(Counter::default);
///
/// let store = manager.allocate_store();
/// store.update(|c| c.count = 5);
///
/// let same = manager.get_store(store.id()).unwrap();
/// assert_eq!(same.get().count, 5);
///
/// same.subscribe((), |_, c| c.count += 1);
/// store.dispatch(Inc);
/// assert_eq!(store.get().count, 6);
///
/// let id = store.id().to_string();
/// manager.free_store(id.as_str()).unwrap();
/// assert!(matches!(
///     manager.get_store(id.as_str()),
///     Err(StoreError::UnknownStore { .. })
/// ));
/// ```
pub struct StoreManager<D, A: Action> {
    next_id: AtomicUsize,
    factory: Factory<D>,
    stores: RwLock<HashMap<String, Store<D, A>>>,
}

impl<D, A: Action> StoreManager<D, A> {
    /// Create an empty manager.
    ///
    /// `factory` builds the initial data of every allocated store. Each call
    /// must return a value that shares no mutable state with earlier ones.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
    {
        Self {
            next_id: AtomicUsize::new(1),
            factory: Box::new(factory),
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate a store with fresh default data under the next identifier.
    pub fn allocate_store(&self) -> Store<D, A> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let store = Store::new(id.clone(), (self.factory)());
        self.stores.write().insert(id, store.clone());
        tracing::debug!(id = %store.id(), "allocated store");
        store
    }

    /// Build a standalone default value without allocating a store.
    pub fn get_default_data(&self) -> D {
        (self.factory)()
    }

    /// Resolve `id` to the store allocated under it.
    ///
    /// Accepts `&str` or `Option<&str>`, so an optional navigation
    /// parameter can be passed straight through.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingIdentifier`] if `id` is `None`,
    /// [`StoreError::UnknownStore`] if nothing is registered under it.
    pub fn get_store<'a>(&self, id: impl Into<Option<&'a str>>) -> StoreResult<Store<D, A>> {
        let id = require_id(id.into(), "get_store")?;
        self.stores
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| unknown(id, "get_store"))
    }

    /// Unregister the store under `id`.
    ///
    /// Handles that are still held keep working, but the id no longer
    /// resolves.
    ///
    /// # Errors
    ///
    /// Same as [`get_store`](StoreManager::get_store).
    pub fn free_store<'a>(&self, id: impl Into<Option<&'a str>>) -> StoreResult<()> {
        let id = require_id(id.into(), "free_store")?;
        if self.stores.write().remove(id).is_none() {
            return Err(unknown(id, "free_store"));
        }
        tracing::debug!(id, "freed store");
        Ok(())
    }

    /// Whether `id` currently resolves to a store.
    pub fn contains(&self, id: &str) -> bool {
        self.stores.read().contains_key(id)
    }

    /// Number of live stores.
    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    /// Whether no stores are live.
    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }
}

fn require_id<'a>(id: Option<&'a str>, operation: &'static str) -> StoreResult<&'a str> {
    id.ok_or(StoreError::MissingIdentifier { operation })
}

fn unknown(id: &str, operation: &'static str) -> StoreError {
    StoreError::UnknownStore {
        id: id.to_string(),
        operation,
    }
}

impl<D, A: Action> fmt::Debug for StoreManager<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreManager")
            .field("next_id", &self.next_id.load(Ordering::SeqCst))
            .field("stores", &self.len())
            .finish_non_exhaustive()
    }
}

/// Create a new [`StoreManager`] with the given default-data factory.
///
/// # Example
///
/// ```ignore
/// let manager = create_store_manager::<Form, FormAction, _>(Form::default);
/// let store = manager.allocate_store();
/// navigate_to(&format!("detail?store_id={}", store.id()));
/// ```
pub fn create_store_manager<D, A, F>(factory: F) -> StoreManager<D, A>
where
    A: Action,
    F: Fn() -> D + Send + Sync + 'static,
{
    StoreManager::new(factory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Draft {
        comment: String,
        images: Vec<String>,
    }

    struct Submit;

    impl Action for Submit {
        type Kind = ();

        fn kind(&self) {}
    }

    fn manager() -> StoreManager<Draft, Submit> {
        create_store_manager(Draft::default)
    }

    #[test]
    fn ids_count_up_from_one() {
        let manager = manager();
        let ids: Vec<String> = (0..3)
            .map(|_| manager.allocate_store().id().to_string())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn freed_ids_are_not_reused() {
        let manager = manager();
        let first = manager.allocate_store();
        manager.free_store(first.id()).unwrap();
        assert_eq!(manager.allocate_store().id(), "2");
    }

    #[test]
    fn lookup_returns_the_same_store() {
        let manager = manager();
        let store = manager.allocate_store();
        let found = manager.get_store(store.id()).unwrap();
        assert!(Store::ptr_eq(&store, &found));

        found.update(|draft| draft.comment = "shared".to_string());
        assert_eq!(store.get().comment, "shared");
    }

    #[test]
    fn missing_id_is_rejected_without_mutation() {
        let manager = manager();
        manager.allocate_store();

        assert_eq!(
            manager.get_store(None).unwrap_err(),
            StoreError::MissingIdentifier {
                operation: "get_store"
            }
        );
        assert_eq!(
            manager.free_store(None).unwrap_err(),
            StoreError::MissingIdentifier {
                operation: "free_store"
            }
        );
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let manager = manager();
        assert_eq!(
            manager.get_store("42").unwrap_err(),
            StoreError::UnknownStore {
                id: "42".to_string(),
                operation: "get_store"
            }
        );
    }

    #[test]
    fn double_free_fails() {
        let manager = manager();
        let store = manager.allocate_store();
        manager.free_store(store.id()).unwrap();
        assert!(matches!(
            manager.free_store(store.id()),
            Err(StoreError::UnknownStore { .. })
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn ids_do_not_cross_managers() {
        let a = manager();
        let b = manager();
        let store = a.allocate_store();
        assert!(matches!(
            b.get_store(store.id()),
            Err(StoreError::UnknownStore { .. })
        ));
    }

    #[test]
    fn default_data_is_independent() {
        let manager = manager();
        let store = manager.allocate_store();

        let mut one = manager.get_default_data();
        let two = manager.get_default_data();
        one.images.push("a.png".to_string());

        assert!(two.images.is_empty());
        assert!(store.get().images.is_empty());
    }

    #[test]
    fn orphaned_handle_keeps_working() {
        let manager = manager();
        let store = manager.allocate_store();
        store.subscribe((), |_, draft| draft.comment.push('!'));
        manager.free_store(store.id()).unwrap();

        store.dispatch(Submit);
        assert_eq!(store.get().comment, "!");
        assert!(!manager.contains(store.id()));
    }
}
