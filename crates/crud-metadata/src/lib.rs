//! Metadata storage for the indexed object store.
//!
//! A small named-entry store living in its own namespace. It records the
//! storage layout version so that a store opened over existing data can
//! refuse an incompatible layout.

pub mod error;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use store::{MetadataStore, SCHEMA_VERSION_KEY};
