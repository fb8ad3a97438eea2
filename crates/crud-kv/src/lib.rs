//! Raw ordered key-value primitive for the indexed object store.
//!
//! # Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] — `BTreeMap`-based store for tests and embedding
//! - [`PrefixStore`] — a namespaced view over any shared backend
//!
//! # Design Rules
//!
//! 1. Single-key operations are atomic; there are no multi-key transactions.
//! 2. Prefix scans are ordered by key bytes.
//! 3. The store never interprets keys or values.
//! 4. Backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod prefix;
pub mod traits;

pub use error::{KvError, KvResult};
pub use memory::InMemoryKvStore;
pub use prefix::PrefixStore;
pub use traits::KvStore;
