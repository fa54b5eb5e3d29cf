//! Identifier-addressed registry of stores.
//!
//! One context allocates a store and passes its id on; another context
//! resolves the id back to the same store. Ids are weak references: they do
//! not keep a store registered and every lookup can fail.

mod manager;

pub use manager::{create_store_manager, StoreManager};
