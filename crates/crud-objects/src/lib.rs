//! Object record storage.
//!
//! Persists encoded objects keyed by primary key inside its own key
//! namespace. Supports create-if-absent, read, update-if-present, delete and
//! ordered enumeration of primary keys.

pub mod error;
pub mod store;

pub use error::{ObjectError, ObjectResult};
pub use store::ObjectStore;
