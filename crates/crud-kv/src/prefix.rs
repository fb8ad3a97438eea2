//! Key namespacing by prefix.
//!
//! A [`PrefixStore`] wraps a shared backend and transparently prepends a
//! fixed prefix to every key. Scans strip the prefix again, so code running
//! on top of a prefix store never sees keys outside its namespace.

use std::sync::Arc;

use crate::error::KvResult;
use crate::traits::KvStore;

/// A view of a shared [`KvStore`] restricted to one key prefix.
///
/// Prefixes are plain byte strings and are not self-delimiting: a store
/// rooted at `"t"` also sees every key of a store rooted at `"t\x00"`.
/// Callers sharing a backend must pick roots where none is a prefix of
/// another.
#[derive(Clone)]
pub struct PrefixStore {
    inner: Arc<dyn KvStore>,
    prefix: Vec<u8>,
}

impl PrefixStore {
    pub fn new(inner: Arc<dyn KvStore>, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// A nested namespace one byte below this one.
    ///
    /// The child shares the same backend; its prefix is this store's prefix
    /// followed by `sub`.
    pub fn child(&self, sub: u8) -> Self {
        let mut prefix = self.prefix.clone();
        prefix.push(sub);
        Self {
            inner: Arc::clone(&self.inner),
            prefix,
        }
    }

    /// The full prefix applied to keys in the shared backend.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(&self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl KvStore for PrefixStore {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.inner.set(&self.full_key(key), value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<bool> {
        self.inner.delete(&self.full_key(key))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let strip = self.prefix.len();
        let entries = self.inner.scan_prefix(&self.full_key(prefix))?;
        Ok(entries
            .into_iter()
            .map(|(k, v)| (k[strip..].to_vec(), v))
            .collect())
    }

    fn scan_keys(&self, prefix: &[u8]) -> KvResult<Vec<Vec<u8>>> {
        let strip = self.prefix.len();
        let keys = self.inner.scan_keys(&self.full_key(prefix))?;
        Ok(keys.into_iter().map(|k| k[strip..].to_vec()).collect())
    }
}

impl std::fmt::Debug for PrefixStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixStore")
            .field("prefix", &hex::encode(&self.prefix))
            .finish()
    }
}
