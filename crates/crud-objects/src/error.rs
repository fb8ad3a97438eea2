use crud_types::{CodecError, KeyRange, PrimaryKey};

/// Errors from object record operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// No record exists at the requested primary key.
    #[error("object not found: {0}")]
    NotFound(PrimaryKey),

    /// A record already exists at the primary key.
    #[error("object already exists: {0}")]
    AlreadyExists(PrimaryKey),

    /// The stored record was written for a different object type.
    #[error("type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: PrimaryKey,
        expected: String,
        found: String,
    },

    /// The requested key range ends before it starts.
    #[error("invalid key range {0}")]
    InvalidRange(KeyRange),

    /// Encoding or decoding a record failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The underlying key-value backend failed.
    #[error("kv error: {0}")]
    Kv(#[from] crud_kv::KvError),
}

/// Result alias for object store operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
