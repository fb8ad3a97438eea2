use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{KvError, KvResult};
use crate::traits::KvStore;

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and embedding. Keys are kept sorted so prefix scans
/// come back in byte order without extra work.
pub struct InMemoryKvStore {
    entries: RwLock<Map>,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn read_map(&self) -> KvResult<RwLockReadGuard<'_, Map>> {
        self.entries
            .read()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))
    }

    fn write_map(&self) -> KvResult<RwLockWriteGuard<'_, Map>> {
        self.entries
            .write()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> KvResult<usize> {
        Ok(self.read_map()?.len())
    }

    pub fn is_empty(&self) -> KvResult<bool> {
        Ok(self.read_map()?.is_empty())
    }

    /// Remove every entry.
    pub fn clear(&self) -> KvResult<()> {
        self.write_map()?.clear();
        Ok(())
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> KvResult<Vec<Vec<u8>>> {
        Ok(self.read_map()?.keys().cloned().collect())
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.write_map()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> KvResult<bool> {
        Ok(self.write_map()?.remove(key).is_some())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let map = self.read_map()?;
        Ok(map
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn scan_keys(&self, prefix: &[u8]) -> KvResult<Vec<Vec<u8>>> {
        let map = self.read_map()?;
        Ok(map
            .range(prefix.to_vec()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.read_map().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryKvStore")
            .field("entry_count", &count)
            .finish()
    }
}
