//! # Handoff
//!
//! Share one piece of mutable state between independent UI contexts
//! (pages, screens) without a global variable.
//!
//! ## Stores
//!
//! A [`Store`] is a data cell plus a typed event channel:
//! - `read` / `update` / `get` / `set` access the shared data
//! - `on` / `off` / `subscribe` manage handlers per [`Action`] kind
//! - `dispatch` runs the handlers for an action in registration order
//!
//! ## Registry
//!
//! A [`StoreManager`] allocates stores under generated string ids, resolves
//! ids back to stores and frees them. The owning context passes the id to
//! another context (for example as a navigation parameter), which looks the
//! store up again:
//!
//! ```
//! use handoff::{Action, StoreManager};
//!
//! #[derive(Clone, Default)]
//! struct Draft {
//!     comment: String,
//! }
//!
//! struct Submit;
//!
//! impl Action for Submit {
//!     type Kind = ();
//!     fn kind(&self) {}
//! }
//!
//! let manager: StoreManager<Draft, Submit> = StoreManager::new(Draft::default);
//!
//! // Main page
//! let store = manager.allocate_store();
//! store.subscribe((), |_, draft| println!("submitted: {}", draft.comment));
//! let url = format!("detail?store_id={}", store.id());
//!
//! // Detail page
//! let id = url.split_once("store_id=").map(|(_, id)| id);
//! let detail = manager.get_store(id).unwrap();
//! detail.update(|draft| draft.comment = "looks good".to_string());
//! detail.dispatch(Submit);
//!
//! // Main page teardown
//! manager.free_store(store.id()).unwrap();
//! ```

pub mod error;
pub mod manager;
pub mod store;

// Re-export main types for convenience
pub use error::{StoreError, StoreResult};
pub use manager::{create_store_manager, StoreManager};
pub use store::{Action, Handler, Store};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
