//! Error types for the index crate.

use crud_types::{KeyRange, PrimaryKey};

/// Errors that can occur during index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// No postings are registered for the primary key.
    #[error("no index entries for {0}")]
    NotFound(PrimaryKey),

    /// The primary key is already indexed, or one of its postings exists.
    #[error("index entries already exist for {0}")]
    AlreadyExists(PrimaryKey),

    /// A filter was requested without any secondary keys.
    #[error("filter requires at least one secondary key")]
    EmptyFilter,

    /// The requested key range ends before it starts.
    #[error("invalid key range {0}")]
    InvalidRange(KeyRange),

    /// A stored index entry could not be decoded.
    #[error("corrupt index entry for {key}: {reason}")]
    Corrupt { key: PrimaryKey, reason: String },

    /// The underlying key-value backend failed.
    #[error("kv error: {0}")]
    Kv(#[from] crud_kv::KvError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
