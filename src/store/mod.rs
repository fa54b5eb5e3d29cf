//! Shared data cells with typed action channels.
//!
//! A [`Store`] holds one value and a set of [`Handler`]s per action kind.
//! Dispatching an [`Action`] runs the handlers for its kind synchronously,
//! in the order they were registered.

mod action;
mod store;

pub use action::{Action, Handler};
pub use store::Store;
