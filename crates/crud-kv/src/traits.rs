use crate::error::KvResult;

/// A raw, ordered, byte-oriented key-value store.
///
/// All implementations must satisfy these invariants:
/// - Single-key reads and writes are atomic. There is no multi-key
///   transaction; callers that touch several keys own their consistency.
/// - `scan_prefix` returns entries in ascending key byte order.
/// - The store never interprets keys or values.
pub trait KvStore: Send + Sync {
    /// Read the value at `key`. Returns `Ok(None)` if absent.
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing any previous value.
    fn set(&self, key: &[u8], value: &[u8]) -> KvResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    fn delete(&self, key: &[u8]) -> KvResult<bool>;

    /// All entries whose key starts with `prefix`, ordered by key.
    ///
    /// Pass an empty prefix to scan everything.
    fn scan_prefix(&self, prefix: &[u8]) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Keys starting with `prefix`, ordered, without their values.
    ///
    /// Default implementation drops the values of `scan_prefix`. Backends
    /// should override it to avoid copying values that are thrown away.
    fn scan_keys(&self, prefix: &[u8]) -> KvResult<Vec<Vec<u8>>> {
        Ok(self
            .scan_prefix(prefix)?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    /// Check whether `key` exists.
    fn contains(&self, key: &[u8]) -> KvResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
