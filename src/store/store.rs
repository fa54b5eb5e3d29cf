use super::action::{Action, Handler};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

type HandlerSet<D, A> = IndexMap<usize, Handler<D, A>>;

struct StoreInner<D, A: Action> {
    id: String,
    data: RwLock<D>,
    subscribers: RwLock<HashMap<A::Kind, HandlerSet<D, A>>>,
    // Thread currently running a fan-out, and the actions its handlers
    // dispatched on this store meanwhile.
    dispatcher: Mutex<Option<ThreadId>>,
    pending: Mutex<VecDeque<A>>,
}

/// Clears the dispatch state when a fan-out ends, including by panic.
struct DispatchGuard<'a, D, A: Action> {
    inner: &'a StoreInner<D, A>,
}

impl<D, A: Action> Drop for DispatchGuard<'_, D, A> {
    fn drop(&mut self) {
        self.inner.pending.lock().clear();
        *self.inner.dispatcher.lock() = None;
    }
}

/// A shared data cell with a typed event channel.
///
/// Handles are cheap to clone and all clones refer to the same store. A
/// store is normally obtained from [`StoreManager`](crate::StoreManager) and
/// looked up again elsewhere by its [`id`](Store::id).
///
/// Handlers run synchronously inside [`dispatch`](Store::dispatch) and get
/// the data as an argument. The data lock is held for the whole fan-out, so
/// a handler must not call `read`, `update`, `get` or `set` on a handle to
/// the same store. Calling `dispatch` from a handler is fine: the action is
/// queued and runs once the current fan-out finishes.
pub struct Store<D, A: Action> {
    inner: Arc<StoreInner<D, A>>,
}

impl<D, A: Action> Store<D, A> {
    pub(crate) fn new(id: String, data: D) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                id,
                data: RwLock::new(data),
                subscribers: RwLock::new(HashMap::new()),
                dispatcher: Mutex::new(None),
                pending: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// The identifier this store was allocated under.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Read the data without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&D) -> R,
    {
        let data = self.inner.data.read();
        f(&*data)
    }

    /// Mutate the data in place. Subscribers are not notified; call
    /// [`dispatch`](Store::dispatch) for that.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut D) -> R,
    {
        let mut data = self.inner.data.write();
        f(&mut *data)
    }

    /// Register `handler` for `kind`.
    ///
    /// Registering a handler that is already present keeps its original
    /// position and does not cause a second delivery.
    pub fn on(&self, kind: A::Kind, handler: &Handler<D, A>) {
        self.inner
            .subscribers
            .write()
            .entry(kind)
            .or_default()
            .entry(handler.key())
            .or_insert_with(|| handler.clone());
    }

    /// Build a handler from `callback`, register it, and return it for a
    /// later [`off`](Store::off).
    pub fn subscribe<F>(&self, kind: A::Kind, callback: F) -> Handler<D, A>
    where
        F: Fn(&A, &mut D) + Send + Sync + 'static,
    {
        let handler = Handler::new(callback);
        self.on(kind, &handler);
        handler
    }

    /// Remove `handler` from `kind`. Unknown handlers and kinds are ignored.
    pub fn off(&self, kind: A::Kind, handler: &Handler<D, A>) {
        if let Some(set) = self.inner.subscribers.write().get_mut(&kind) {
            set.shift_remove(&handler.key());
        }
    }

    /// Run every handler registered for `action.kind()`, in registration order.
    ///
    /// The handler set is snapshotted first, so `on`/`off` calls made by a
    /// handler take effect from the next dispatch. A kind with no handlers is
    /// a no-op.
    ///
    /// A dispatch made by a handler on the same store does not run inline.
    /// It is queued and returns at once; the outer call drains the queue in
    /// FIFO order after its own fan-out, before it returns.
    pub fn dispatch(&self, action: A) {
        let current = thread::current().id();
        if *self.inner.dispatcher.lock() == Some(current) {
            tracing::trace!(
                store = %self.inner.id,
                kind = ?action.kind(),
                "queued nested dispatch"
            );
            self.inner.pending.lock().push_back(action);
            return;
        }

        let mut data = self.inner.data.write();
        *self.inner.dispatcher.lock() = Some(current);
        let _guard = DispatchGuard { inner: &*self.inner };

        let mut next = Some(action);
        while let Some(action) = next {
            self.fan_out(&action, &mut *data);
            next = self.inner.pending.lock().pop_front();
        }
    }

    fn fan_out(&self, action: &A, data: &mut D) {
        let kind = action.kind();
        let handlers: Vec<Handler<D, A>> = self
            .inner
            .subscribers
            .read()
            .get(&kind)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default();

        tracing::trace!(
            store = %self.inner.id,
            ?kind,
            handlers = handlers.len(),
            "dispatch"
        );

        for handler in &handlers {
            handler.call(action, data);
        }
    }

    /// Number of handlers currently registered for `kind`.
    pub fn subscriber_count(&self, kind: A::Kind) -> usize {
        self.inner
            .subscribers
            .read()
            .get(&kind)
            .map_or(0, IndexMap::len)
    }

    /// Whether two handles refer to the same store.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

impl<D: Clone, A: Action> Store<D, A> {
    /// Get a clone of the current data.
    pub fn get(&self) -> D {
        self.inner.data.read().clone()
    }

    /// Overwrite the data. The cell itself stays the same.
    pub fn set(&self, data: D) {
        *self.inner.data.write() = data;
    }
}

impl<D, A: Action> Clone for Store<D, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, A: Action> fmt::Debug for Store<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("kinds", &self.inner.subscribers.read().len())
            .finish_non_exhaustive()
    }
}
