use std::sync::Arc;

use crud_kv::{KvStore, PrefixStore};
use crud_types::{Codec, KeyRange, Object, PrimaryKey};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ObjectError, ObjectResult};

/// Record envelope written when type verification is enabled.
#[derive(Serialize, Deserialize)]
struct TypedRecord {
    type_name: String,
    payload: Vec<u8>,
}

/// Stores encoded objects keyed by their primary key.
///
/// Every key in the backing namespace is a primary key; the value is the
/// object encoded with the store's codec (optionally wrapped in a type
/// envelope). Enumeration order is primary-key byte order.
pub struct ObjectStore<C> {
    kv: PrefixStore,
    codec: Arc<C>,
    verify_types: bool,
}

impl<C: Codec> ObjectStore<C> {
    pub fn new(kv: PrefixStore, codec: Arc<C>) -> Self {
        Self {
            kv,
            codec,
            verify_types: false,
        }
    }

    /// Record each object's type name and check it on read.
    pub fn with_type_verification(mut self, verify: bool) -> Self {
        self.verify_types = verify;
        self
    }

    pub fn verifies_types(&self) -> bool {
        self.verify_types
    }

    /// Insert a new record. Fails with `AlreadyExists` if the key is taken.
    pub fn create<T: Object>(&self, object: &T) -> ObjectResult<()> {
        let key = object.primary_key();
        if self.kv.contains(key.as_bytes())? {
            return Err(ObjectError::AlreadyExists(key));
        }
        let bytes = self.encode(object)?;
        self.kv.set(key.as_bytes(), &bytes)?;
        trace!(pk = %key, len = bytes.len(), "object record created");
        Ok(())
    }

    /// Read and decode the record at `key`.
    pub fn read<T: Object>(&self, key: &PrimaryKey) -> ObjectResult<T> {
        let bytes = self
            .kv
            .get(key.as_bytes())?
            .ok_or_else(|| ObjectError::NotFound(key.clone()))?;
        self.decode(key, &bytes)
    }

    /// Overwrite an existing record. Fails with `NotFound` if absent.
    pub fn update<T: Object>(&self, object: &T) -> ObjectResult<()> {
        let key = object.primary_key();
        if !self.kv.contains(key.as_bytes())? {
            return Err(ObjectError::NotFound(key));
        }
        let bytes = self.encode(object)?;
        self.kv.set(key.as_bytes(), &bytes)?;
        trace!(pk = %key, len = bytes.len(), "object record updated");
        Ok(())
    }

    /// Remove the record at `key`. Fails with `NotFound` if absent.
    pub fn delete(&self, key: &PrimaryKey) -> ObjectResult<()> {
        if !self.kv.delete(key.as_bytes())? {
            return Err(ObjectError::NotFound(key.clone()));
        }
        trace!(pk = %key, "object record deleted");
        Ok(())
    }

    pub fn contains(&self, key: &PrimaryKey) -> ObjectResult<bool> {
        Ok(self.kv.contains(key.as_bytes())?)
    }

    /// Primary keys of all records in key order, windowed by `range`.
    pub fn get_all_keys(&self, range: KeyRange) -> ObjectResult<Vec<PrimaryKey>> {
        if !range.is_valid() {
            return Err(ObjectError::InvalidRange(range));
        }
        let keys = self.kv.scan_keys(&[])?;
        Ok(range.apply(keys.into_iter().map(PrimaryKey::new)))
    }

    fn encode<T: Object>(&self, object: &T) -> ObjectResult<Vec<u8>> {
        let payload = self.codec.encode(object)?;
        if !self.verify_types {
            return Ok(payload);
        }
        let record = TypedRecord {
            type_name: T::type_name().to_string(),
            payload,
        };
        Ok(self.codec.encode(&record)?)
    }

    fn decode<T: Object>(&self, key: &PrimaryKey, bytes: &[u8]) -> ObjectResult<T> {
        if !self.verify_types {
            return Ok(self.codec.decode(bytes)?);
        }
        let record: TypedRecord = self.codec.decode(bytes)?;
        if record.type_name != T::type_name() {
            return Err(ObjectError::TypeMismatch {
                key: key.clone(),
                expected: T::type_name().to_string(),
                found: record.type_name,
            });
        }
        Ok(self.codec.decode(&record.payload)?)
    }
}

impl<C: Codec> std::fmt::Debug for ObjectStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("kv", &self.kv)
            .field("codec", &self.codec.name())
            .field("verify_types", &self.verify_types)
            .finish()
    }
}
