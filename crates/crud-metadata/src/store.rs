use crud_kv::{KvStore, PrefixStore};
use tracing::{debug, info};

use crate::error::{MetadataError, MetadataResult};

/// Entry name under which the storage layout version is recorded.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Auxiliary bookkeeping entries, kept apart from objects and indexes.
///
/// Entries are small named byte values. The only entry the store itself
/// relies on is the schema version written by [`MetadataStore::init`].
pub struct MetadataStore {
    kv: PrefixStore,
}

impl MetadataStore {
    pub fn new(kv: PrefixStore) -> Self {
        Self { kv }
    }

    /// Record `schema_version` on first use, or check it against the one
    /// already recorded.
    pub fn init(&self, schema_version: u32) -> MetadataResult<()> {
        match self.schema_version()? {
            None => {
                let bytes = encode_u32(schema_version)?;
                self.kv.set(SCHEMA_VERSION_KEY.as_bytes(), &bytes)?;
                info!(schema_version, "metadata initialized");
                Ok(())
            }
            Some(found) if found == schema_version => {
                debug!(schema_version, "metadata already initialized");
                Ok(())
            }
            Some(found) => Err(MetadataError::SchemaMismatch {
                expected: schema_version,
                found,
            }),
        }
    }

    /// The recorded schema version, if any.
    pub fn schema_version(&self) -> MetadataResult<Option<u32>> {
        let Some(bytes) = self.kv.get(SCHEMA_VERSION_KEY.as_bytes())? else {
            return Ok(None);
        };
        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|e| MetadataError::Corrupt {
                name: SCHEMA_VERSION_KEY.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> MetadataResult<Option<Vec<u8>>> {
        Ok(self.kv.get(name.as_bytes())?)
    }

    pub fn set(&self, name: &str, value: &[u8]) -> MetadataResult<()> {
        self.kv.set(name.as_bytes(), value)?;
        Ok(())
    }

    /// Remove an entry. Returns `true` if it existed.
    pub fn remove(&self, name: &str) -> MetadataResult<bool> {
        Ok(self.kv.delete(name.as_bytes())?)
    }

    /// All entries, ordered by name.
    pub fn entries(&self) -> MetadataResult<Vec<(String, Vec<u8>)>> {
        self.kv
            .scan_prefix(&[])?
            .into_iter()
            .map(|(k, v)| {
                String::from_utf8(k)
                    .map(|name| (name, v))
                    .map_err(|e| MetadataError::Corrupt {
                        name: hex::encode(e.as_bytes()),
                        reason: "entry name is not utf-8".to_string(),
                    })
            })
            .collect()
    }
}

fn encode_u32(value: u32) -> MetadataResult<Vec<u8>> {
    bincode::serialize(&value).map_err(|e| MetadataError::Corrupt {
        name: SCHEMA_VERSION_KEY.to_string(),
        reason: e.to_string(),
    })
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore").field("kv", &self.kv).finish()
    }
}
