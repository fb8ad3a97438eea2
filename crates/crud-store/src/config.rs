use serde::{Deserialize, Serialize};

/// Storage layout version recorded in the metadata namespace.
pub const SCHEMA_VERSION: u32 = 1;

/// Configuration for a [`Store`](crate::Store).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root key prefix. Objects, indexes and metadata live in disjoint
    /// one-byte sub-namespaces below it.
    ///
    /// Roots are not self-delimiting. Stores sharing one backend need roots
    /// where none is a prefix of another: a store rooted at `t` sees the
    /// records of a store rooted at `t\x00` as its own objects.
    pub prefix: Vec<u8>,
    /// Record each object's type name and reject reads into another type.
    pub verify_types: bool,
    /// Layout version checked against the one already recorded, if any.
    pub schema_version: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: Vec::new(),
            verify_types: false,
            schema_version: SCHEMA_VERSION,
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `prefix`.
    pub fn with_prefix(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Enable object type verification.
    pub fn with_type_verification(mut self) -> Self {
        self.verify_types = true;
        self
    }
}
