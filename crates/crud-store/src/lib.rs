//! Indexed object store.
//!
//! CRUD over serializable domain objects with secondary-key and range
//! queries, layered on a raw ordered key-value backend. The store keeps
//! object records and their secondary-key postings consistent without
//! multi-key transactions, relying on write ordering, a compensating delete
//! for failed creates, and a fatal corruption channel for everything else.
//!
//! # Key Types
//!
//! - [`Store`] — create / read / update / delete / query
//! - [`Cursor`] — snapshot iterator over query results with per-position
//!   read, update and delete
//! - [`StoreConfig`] — namespace prefix, type verification, schema version
//! - [`StoreError`] — `NotFound` / `AlreadyExists` are recoverable;
//!   `Corruption` / `Halted` are fatal
//!
//! # Example
//!
//! ```
//! use crud_store::{KeyRange, Object, PrimaryKey, SecondaryKey, Store, StoreConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Account {
//!     name: String,
//!     region: String,
//! }
//!
//! impl Object for Account {
//!     fn primary_key(&self) -> PrimaryKey {
//!         PrimaryKey::from(self.name.as_str())
//!     }
//!
//!     fn secondary_keys(&self) -> Vec<SecondaryKey> {
//!         vec![SecondaryKey::from_str_value("region", &self.region)]
//!     }
//! }
//!
//! let store = Store::in_memory(StoreConfig::default()).unwrap();
//! store.create(&Account { name: "alice".into(), region: "eu".into() }).unwrap();
//!
//! let cursor = store
//!     .query(&[SecondaryKey::from_str_value("region", "eu")], KeyRange::all())
//!     .unwrap();
//! let found: Account = cursor.read().unwrap();
//! assert_eq!(found.name, "alice");
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{StoreConfig, SCHEMA_VERSION};
pub use cursor::Cursor;
pub use error::{CorruptionError, Operation, StoreError, StoreResult};
pub use store::{Store, INDEXES_PREFIX, METADATA_PREFIX, OBJECTS_PREFIX};

pub use crud_kv::{InMemoryKvStore, KvStore};
pub use crud_types::{BincodeCodec, Codec, JsonCodec, KeyRange, Object, PrimaryKey, SecondaryKey};
