//! Test fixtures: a sample object type and a fault-injecting backend.

use std::sync::Mutex;

use crud_kv::{InMemoryKvStore, KvError, KvResult, KvStore};
use crud_types::{Object, PrimaryKey, SecondaryKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub category: String,
    pub height: u64,
}

impl Object for Record {
    fn primary_key(&self) -> PrimaryKey {
        PrimaryKey::from(self.id.as_str())
    }

    fn secondary_keys(&self) -> Vec<SecondaryKey> {
        vec![
            category(&self.category),
            SecondaryKey::from_u64("height", self.height),
        ]
    }
}

pub fn record(id: &str, category: &str, height: u64) -> Record {
    Record {
        id: id.to_string(),
        category: category.to_string(),
        height,
    }
}

pub fn category(value: &str) -> SecondaryKey {
    SecondaryKey::from_str_value("category", value)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-memory backend that fails writes or deletes under chosen prefixes.
#[derive(Default)]
pub struct FaultyKv {
    inner: InMemoryKvStore,
    failing_writes: Mutex<Vec<Vec<u8>>>,
    failing_deletes: Mutex<Vec<Vec<u8>>>,
}

impl FaultyKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_under(&self, prefix: Vec<u8>) {
        self.failing_writes.lock().unwrap().push(prefix);
    }

    pub fn fail_deletes_under(&self, prefix: Vec<u8>) {
        self.failing_deletes.lock().unwrap().push(prefix);
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        self.failing_writes.lock().unwrap().clear();
        self.failing_deletes.lock().unwrap().clear();
    }

    fn check(rules: &Mutex<Vec<Vec<u8>>>, key: &[u8], op: &str) -> KvResult<()> {
        if rules.lock().unwrap().iter().any(|p| key.starts_with(p)) {
            return Err(KvError::Backend(format!("injected {op} failure")));
        }
        Ok(())
    }
}

impl KvStore for FaultyKv {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        Self::check(&self.failing_writes, key, "write")?;
        self.inner.set(key, value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<bool> {
        Self::check(&self.failing_deletes, key, "delete")?;
        self.inner.delete(key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        self.inner.scan_prefix(prefix)
    }
}
