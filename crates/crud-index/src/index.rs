//! The postings index mapping secondary keys back to primary keys.
//!
//! The index namespace is split in two:
//!
//! - postings (`0x00`): `secondary_key.encode_prefix() ++ primary_key` with an
//!   empty value, so a prefix scan on one secondary key yields every matching
//!   primary key in byte order;
//! - reverse entries (`0x01`): `primary_key` mapped to the bincode-encoded
//!   list of secondary keys the object was indexed under. Removal is driven by
//!   this list, never by the caller's current view of the object.

use std::collections::BTreeSet;

use crud_kv::{KvStore, PrefixStore};
use crud_types::{KeyRange, Object, PrimaryKey, SecondaryKey};
use tracing::{trace, warn};

use crate::error::{IndexError, IndexResult};

/// Sub-namespace holding postings.
pub const POSTINGS_PREFIX: u8 = 0x00;

/// Sub-namespace holding per-object reverse entries.
pub const REVERSE_PREFIX: u8 = 0x01;

/// Secondary-key postings store.
pub struct IndexStore {
    postings: PrefixStore,
    reverse: PrefixStore,
}

impl IndexStore {
    /// Create an index over the given namespace.
    pub fn new(kv: PrefixStore) -> Self {
        Self {
            postings: kv.child(POSTINGS_PREFIX),
            reverse: kv.child(REVERSE_PREFIX),
        }
    }

    /// Add postings for every secondary key of `object`.
    ///
    /// Fails with `AlreadyExists` if the object is already indexed or any of
    /// its postings is present. Nothing is written in that case. Duplicate
    /// secondary keys collapse into one posting.
    ///
    /// If a backend write fails partway, the postings already written are
    /// removed again before the error is returned. Should that cleanup fail
    /// too, the reverse entry is kept and [`IndexStore::is_indexed`] reports
    /// `true`, so the leftovers can still be removed with `delete`.
    pub fn index<T: Object>(&self, object: &T) -> IndexResult<()> {
        let pk = object.primary_key();
        if self.reverse.contains(pk.as_bytes())? {
            return Err(IndexError::AlreadyExists(pk));
        }

        let keys: BTreeSet<SecondaryKey> = object.secondary_keys().into_iter().collect();
        let posting_keys: Vec<Vec<u8>> = keys.iter().map(|sk| posting_key(sk, &pk)).collect();
        for key in &posting_keys {
            if self.postings.contains(key)? {
                return Err(IndexError::AlreadyExists(pk));
            }
        }

        let keys: Vec<SecondaryKey> = keys.into_iter().collect();
        let reverse = bincode::serialize(&keys).map_err(|e| IndexError::Corrupt {
            key: pk.clone(),
            reason: e.to_string(),
        })?;

        // The reverse entry goes first so `delete(pk)` can always find
        // whatever postings made it to the backend.
        self.reverse.set(pk.as_bytes(), &reverse)?;
        for (written, key) in posting_keys.iter().enumerate() {
            if let Err(err) = self.postings.set(key, &[]) {
                self.undo_partial(&pk, &posting_keys[..written]);
                return Err(err.into());
            }
        }
        trace!(pk = %pk, postings = posting_keys.len(), "object indexed");
        Ok(())
    }

    /// Best-effort removal of a partially written index entry.
    ///
    /// The reverse entry is only dropped once every written posting is gone,
    /// so anything left behind stays reachable through `delete(pk)`.
    fn undo_partial(&self, pk: &PrimaryKey, written: &[Vec<u8>]) {
        let mut clean = true;
        for key in written {
            if let Err(err) = self.postings.delete(key) {
                warn!(pk = %pk, error = %err, "failed to remove partial posting");
                clean = false;
            }
        }
        if clean {
            if let Err(err) = self.reverse.delete(pk.as_bytes()) {
                warn!(pk = %pk, error = %err, "failed to remove partial reverse entry");
            }
        }
    }

    /// Remove every posting recorded for `pk`.
    ///
    /// Fails with `NotFound` if `pk` was never indexed.
    pub fn delete(&self, pk: &PrimaryKey) -> IndexResult<()> {
        let keys = self.secondary_keys(pk)?;
        for sk in &keys {
            self.postings.delete(&posting_key(sk, pk))?;
        }
        self.reverse.delete(pk.as_bytes())?;
        trace!(pk = %pk, postings = keys.len(), "object unindexed");
        Ok(())
    }

    /// Secondary keys `pk` is currently indexed under.
    pub fn secondary_keys(&self, pk: &PrimaryKey) -> IndexResult<Vec<SecondaryKey>> {
        let bytes = self
            .reverse
            .get(pk.as_bytes())?
            .ok_or_else(|| IndexError::NotFound(pk.clone()))?;
        bincode::deserialize(&bytes).map_err(|e| IndexError::Corrupt {
            key: pk.clone(),
            reason: e.to_string(),
        })
    }

    /// Returns `true` if `pk` has a reverse entry.
    pub fn is_indexed(&self, pk: &PrimaryKey) -> IndexResult<bool> {
        Ok(self.reverse.contains(pk.as_bytes())?)
    }

    /// Primary keys posted under a single secondary key, in key order.
    pub fn postings(&self, sk: &SecondaryKey) -> IndexResult<Vec<PrimaryKey>> {
        let prefix = sk.encode_prefix();
        let keys = self.postings.scan_keys(&prefix)?;
        Ok(keys
            .into_iter()
            .map(|k| PrimaryKey::new(k[prefix.len()..].to_vec()))
            .collect())
    }

    /// Primary keys matching *every* key in `keys`, windowed by `range`.
    ///
    /// Results are in primary-key byte order. The window applies to the
    /// intersection, not to the per-key posting lists.
    pub fn filter(&self, keys: &[SecondaryKey], range: KeyRange) -> IndexResult<Vec<PrimaryKey>> {
        if !range.is_valid() {
            return Err(IndexError::InvalidRange(range));
        }
        let unique: BTreeSet<&SecondaryKey> = keys.iter().collect();
        let mut iter = unique.into_iter();
        let first = iter.next().ok_or(IndexError::EmptyFilter)?;

        let mut matches = self.postings(first)?;
        for sk in iter {
            if matches.is_empty() {
                break;
            }
            let other: BTreeSet<PrimaryKey> = self.postings(sk)?.into_iter().collect();
            matches.retain(|pk| other.contains(pk));
        }
        Ok(range.apply(matches))
    }
}

fn posting_key(sk: &SecondaryKey, pk: &PrimaryKey) -> Vec<u8> {
    let mut key = sk.encode_prefix();
    key.extend_from_slice(pk.as_bytes());
    key
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("postings", &self.postings)
            .field("reverse", &self.reverse)
            .finish()
    }
}
