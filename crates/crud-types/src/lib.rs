//! Foundation types for the indexed object store.
//!
//! Every other crate in the workspace depends on `crud-types`.
//!
//! # Key Types
//!
//! - [`PrimaryKey`] — unique byte-sequence identifier of a stored object
//! - [`SecondaryKey`] — named, sortable attribute used for filtering
//! - [`Object`] — the contract a domain type implements to be stored
//! - [`Codec`] — object serializer ([`BincodeCodec`], [`JsonCodec`])
//! - [`KeyRange`] — positional `[start, end)` window over query results

pub mod codec;
pub mod error;
pub mod key;
pub mod object;
pub mod range;

pub use codec::{BincodeCodec, Codec, JsonCodec};
pub use error::CodecError;
pub use key::{PrimaryKey, SecondaryKey};
pub use object::Object;
pub use range::KeyRange;
