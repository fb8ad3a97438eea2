/// Errors from key-value backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KvError {
    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("backend lock poisoned: {0}")]
    LockPoisoned(String),

    /// Failure reported by the storage backend itself.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for key-value operations.
pub type KvResult<T> = Result<T, KvError>;
