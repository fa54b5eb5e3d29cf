use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A closed set of events a [`Store`](crate::Store) can dispatch.
///
/// Implement this on an enum with one variant per action. The variant's
/// fields are the payload; [`Action::kind`] maps a value to the fieldless tag
/// that handlers subscribe under.
///
/// # Example
///
/// ```
/// use handoff::Action;
///
/// enum PageAction {
///     Submit,
///     Rename(String),
/// }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum PageActionKind {
///     Submit,
///     Rename,
/// }
///
/// impl Action for PageAction {
///     type Kind = PageActionKind;
///
///     fn kind(&self) -> PageActionKind {
///         match self {
///             PageAction::Submit => PageActionKind::Submit,
///             PageAction::Rename(_) => PageActionKind::Rename,
///         }
///     }
/// }
/// ```
///
/// `strum`'s `EnumDiscriminants` derive generates the kind enum for you.
pub trait Action {
    /// Tag identifying which handlers receive a dispatched value.
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

type Callback<D, A> = dyn Fn(&A, &mut D) + Send + Sync;

/// A subscribed callback with a stable identity.
///
/// Clones share identity: registering any clone of a handler that is already
/// registered for a kind is a no-op, and any clone can be passed to
/// [`Store::off`](crate::Store::off) to remove it.
pub struct Handler<D, A> {
    callback: Arc<Callback<D, A>>,
}

impl<D, A> Handler<D, A> {
    /// Wrap a callback. It receives the dispatched action and the store's data.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&A, &mut D) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Identity key, stable for as long as any clone is alive.
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.callback) as *const () as usize
    }

    pub(crate) fn call(&self, action: &A, data: &mut D) {
        (self.callback)(action, data);
    }

    /// Whether two handlers are clones of the same registration.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<D, A> Clone for Handler<D, A> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<D, A> fmt::Debug for Handler<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&format_args!("{:#x}", self.key()))
            .finish()
    }
}
