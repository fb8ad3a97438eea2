//! Secondary-key index for the indexed object store.
//!
//! Maintains, for each secondary key derived from a stored object, a posting
//! pointing back at the object's primary key, and answers intersection
//! filters over those postings.
//!
//! # Key Types
//!
//! - [`IndexStore`] — postings plus per-object reverse entries
//! - [`IndexError`] — failure modes, including `NotFound` / `AlreadyExists`

pub mod error;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::{IndexStore, POSTINGS_PREFIX, REVERSE_PREFIX};
