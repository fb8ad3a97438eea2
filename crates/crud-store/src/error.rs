use std::fmt;

use crud_index::IndexError;
use crud_kv::KvError;
use crud_metadata::MetadataError;
use crud_objects::ObjectError;
use crud_types::{CodecError, KeyRange, PrimaryKey};

/// The store operation during which an inconsistency was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Details of a detected object/index inconsistency.
///
/// Raised when a write that must succeed (after the point of no return in
/// update or delete, or the compensating delete of a failed create) fails.
/// The object and index namespaces may disagree for `primary_key`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("state corruption during {operation} of {primary_key}: {cause}{}", rollback_suffix(.rollback_cause))]
pub struct CorruptionError {
    pub operation: Operation,
    pub primary_key: PrimaryKey,
    /// The failure that left the store partially mutated.
    pub cause: String,
    /// For create: why the compensating delete failed.
    pub rollback_cause: Option<String>,
}

fn rollback_suffix(cause: &Option<String>) -> String {
    match cause {
        Some(c) => format!(" (rollback failed: {c})"),
        None => String::new(),
    }
}

/// Errors returned by [`Store`](crate::Store) and [`Cursor`](crate::Cursor).
///
/// `NotFound` and `AlreadyExists` are ordinary, recoverable outcomes.
/// `Corruption` and `Halted` are fatal: see [`StoreError::is_fatal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The object (or its index entries) does not exist.
    #[error("not found: {0}")]
    NotFound(PrimaryKey),

    /// An object or index entry already exists for the primary key.
    #[error("already exists: {0}")]
    AlreadyExists(PrimaryKey),

    /// The stored record belongs to another object type.
    #[error("type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: PrimaryKey,
        expected: String,
        found: String,
    },

    /// The query range ends before it starts.
    #[error("invalid key range {0}")]
    InvalidRange(KeyRange),

    /// The cursor has moved past its last key.
    #[error("cursor exhausted at position {position} of {len}")]
    CursorExhausted { position: usize, len: usize },

    /// The object handed to a position-checked cursor update does not
    /// belong at the cursor's current key.
    #[error("cursor key mismatch: positioned at {expected}, object key is {found}")]
    KeyMismatch {
        expected: PrimaryKey,
        found: PrimaryKey,
    },

    /// Objects and indexes have diverged. The store halts after this.
    #[error(transparent)]
    Corruption(Box<CorruptionError>),

    /// A previous operation detected corruption; the store refuses all work.
    #[error("store halted after state corruption")]
    Halted,

    #[error("codec error: {0}")]
    Codec(CodecError),

    #[error("kv error: {0}")]
    Kv(KvError),

    #[error("index error: {0}")]
    Index(IndexError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl StoreError {
    /// Fatal errors must never be retried: the host should stop processing
    /// and inspect the storage backend.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Corruption(_) | Self::Halted)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    /// Corruption details, if this is a corruption error.
    pub fn corruption(&self) -> Option<&CorruptionError> {
        match self {
            Self::Corruption(c) => Some(c),
            _ => None,
        }
    }
}

impl From<CorruptionError> for StoreError {
    fn from(err: CorruptionError) -> Self {
        Self::Corruption(Box::new(err))
    }
}

impl From<ObjectError> for StoreError {
    fn from(err: ObjectError) -> Self {
        match err {
            ObjectError::NotFound(pk) => Self::NotFound(pk),
            ObjectError::AlreadyExists(pk) => Self::AlreadyExists(pk),
            ObjectError::TypeMismatch {
                key,
                expected,
                found,
            } => Self::TypeMismatch {
                key,
                expected,
                found,
            },
            ObjectError::InvalidRange(r) => Self::InvalidRange(r),
            ObjectError::Codec(e) => Self::Codec(e),
            ObjectError::Kv(e) => Self::Kv(e),
        }
    }
}

impl From<IndexError> for StoreError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::NotFound(pk) => Self::NotFound(pk),
            IndexError::AlreadyExists(pk) => Self::AlreadyExists(pk),
            IndexError::InvalidRange(r) => Self::InvalidRange(r),
            IndexError::Kv(e) => Self::Kv(e),
            other => Self::Index(other),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
