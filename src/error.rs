//! Errors returned by registry lookups.

/// Errors from [`StoreManager`](crate::StoreManager) operations.
///
/// Both variants point at a bug in the calling code (a missing parameter, a
/// double free, a stale or foreign id). Nothing in this crate retries them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No id was supplied.
    #[error("expected a store id in {operation}, found none")]
    MissingIdentifier { operation: &'static str },

    /// The id is not registered: already freed, never allocated, or
    /// allocated by a different manager.
    #[error("no store is registered with id={id} in {operation}")]
    UnknownStore { id: String, operation: &'static str },
}

/// Result alias for registry operations.
pub type StoreResult<T> = Result<T, StoreError>;
