/// Errors produced by metadata operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: u32, found: u32 },

    #[error("corrupt metadata entry {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("kv error: {0}")]
    Kv(#[from] crud_kv::KvError),
}

pub type MetadataResult<T> = Result<T, MetadataError>;
