use crud_types::{Codec, Object, PrimaryKey};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// Forward-only cursor over a snapshot of query results.
///
/// The key sequence is fixed when the query runs. Writes made afterwards are
/// not reflected, except that reading a key deleted since then yields
/// `NotFound`. The cursor never caches decoded objects; every read goes back
/// to the store.
///
/// Operations at an exhausted position fail with
/// [`StoreError::CursorExhausted`].
pub struct Cursor<'a, C: Codec> {
    store: &'a Store<C>,
    keys: Vec<PrimaryKey>,
    position: usize,
}

impl<'a, C: Codec> Cursor<'a, C> {
    pub(crate) fn new(store: &'a Store<C>, keys: Vec<PrimaryKey>) -> Self {
        Self {
            store,
            keys,
            position: 0,
        }
    }

    /// `true` while the cursor points at a key.
    pub fn valid(&self) -> bool {
        self.position < self.keys.len()
    }

    /// Advance by one. A no-op once the cursor is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.valid() {
            self.position += 1;
        }
    }

    /// Number of keys in the snapshot.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The key at the current position, if any.
    pub fn key(&self) -> Option<&PrimaryKey> {
        self.keys.get(self.position)
    }

    /// The full snapshot, in iteration order.
    pub fn keys(&self) -> &[PrimaryKey] {
        &self.keys
    }

    /// Read the object at the current position.
    pub fn read<T: Object>(&self) -> StoreResult<T> {
        let key = self.current()?;
        self.store.read(key)
    }

    /// Update an object through the owning store.
    ///
    /// This is a pass-through: the record addressed is the one named by
    /// `object`'s own primary key, which need not be the current key. Use
    /// [`Cursor::update_current`] to have the position checked.
    pub fn update<T: Object>(&self, object: &T) -> StoreResult<()> {
        self.current()?;
        self.store.update(object)
    }

    /// Update the object at the current position.
    ///
    /// Fails with `KeyMismatch` if `object`'s primary key is not the current
    /// key.
    pub fn update_current<T: Object>(&self, object: &T) -> StoreResult<()> {
        let key = self.current()?;
        let found = object.primary_key();
        if &found != key {
            return Err(StoreError::KeyMismatch {
                expected: key.clone(),
                found,
            });
        }
        self.store.update(object)
    }

    /// Delete the object at the current position. The cursor does not move.
    pub fn delete(&self) -> StoreResult<()> {
        let key = self.current()?;
        self.store.delete(key)
    }

    fn current(&self) -> StoreResult<&PrimaryKey> {
        self.keys.get(self.position).ok_or(StoreError::CursorExhausted {
            position: self.position,
            len: self.keys.len(),
        })
    }
}

impl<C: Codec> std::fmt::Debug for Cursor<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("len", &self.keys.len())
            .field("key", &self.key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::testing::{category, record, Record};
    use crud_types::KeyRange;

    fn make_store() -> Store {
        Store::in_memory(StoreConfig::default()).unwrap()
    }

    fn seeded() -> Store {
        let store = make_store();
        store.create(&record("a", "x", 1)).unwrap();
        store.create(&record("b", "x", 2)).unwrap();
        store.create(&record("c", "y", 3)).unwrap();
        store
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    #[test]
    fn becomes_invalid_after_len_steps() {
        let store = seeded();
        let mut cursor = store.query_all().unwrap();
        assert_eq!(cursor.len(), 3);
        for step in 0..3 {
            assert!(cursor.valid(), "valid before step {step}");
            cursor.next();
        }
        assert!(!cursor.valid());
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn next_past_end_is_noop() {
        let store = seeded();
        let mut cursor = store.query(&[category("y")], KeyRange::all()).unwrap();
        cursor.next();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.position(), 1);
        assert!(cursor.key().is_none());
    }

    #[test]
    fn empty_result_is_immediately_invalid() {
        let store = seeded();
        let cursor = store.query(&[category("none")], KeyRange::all()).unwrap();
        assert!(cursor.is_empty());
        assert!(!cursor.valid());
    }

    #[test]
    fn operations_on_exhausted_cursor_fail() {
        let store = seeded();
        let mut cursor = store.query(&[category("y")], KeyRange::all()).unwrap();
        cursor.next();

        let exhausted = StoreError::CursorExhausted { position: 1, len: 1 };
        assert_eq!(cursor.read::<Record>().unwrap_err(), exhausted);
        assert_eq!(cursor.delete().unwrap_err(), exhausted);
        assert_eq!(cursor.update(&record("c", "z", 3)).unwrap_err(), exhausted);
        assert_eq!(cursor.update_current(&record("c", "z", 3)).unwrap_err(), exhausted);
        // Nothing changed underneath.
        assert_eq!(store.read::<Record>(&PrimaryKey::from("c")).unwrap().category, "y");
    }

    // ---------------------------------------------------------------
    // Snapshot semantics
    // ---------------------------------------------------------------

    #[test]
    fn snapshot_ignores_later_inserts() {
        let store = seeded();
        let cursor = store.query(&[category("x")], KeyRange::all()).unwrap();
        store.create(&record("d", "x", 4)).unwrap();
        assert_eq!(cursor.len(), 2);
        assert_eq!(store.query(&[category("x")], KeyRange::all()).unwrap().len(), 3);
    }

    #[test]
    fn read_after_external_delete_is_not_found() {
        let store = seeded();
        let cursor = store.query_all().unwrap();
        store.delete(&PrimaryKey::from("a")).unwrap();
        assert_eq!(cursor.key(), Some(&PrimaryKey::from("a")));
        assert!(cursor.read::<Record>().unwrap_err().is_not_found());
    }

    // ---------------------------------------------------------------
    // Mutation through the cursor
    // ---------------------------------------------------------------

    #[test]
    fn read_update_delete_at_position() {
        let store = seeded();
        let cursor = store.query(&[category("x")], KeyRange::all()).unwrap();

        let mut current: Record = cursor.read().unwrap();
        assert_eq!(current.id, "a");

        current.category = "moved".into();
        cursor.update(&current).unwrap();
        assert_eq!(cursor.read::<Record>().unwrap(), current);
        assert_eq!(
            store.query(&[category("moved")], KeyRange::all()).unwrap().keys(),
            &[PrimaryKey::from("a")]
        );

        cursor.delete().unwrap();
        assert!(cursor.read::<Record>().unwrap_err().is_not_found());
        assert!(cursor.delete().unwrap_err().is_not_found());
    }

    #[test]
    fn update_is_pass_through() {
        let store = seeded();
        let cursor = store.query_all().unwrap();
        assert_eq!(cursor.key(), Some(&PrimaryKey::from("a")));

        // The object names "b"; "b" is updated even though the cursor sits on "a".
        cursor.update(&record("b", "z", 9)).unwrap();
        assert_eq!(store.read::<Record>(&PrimaryKey::from("b")).unwrap().category, "z");
        assert_eq!(store.read::<Record>(&PrimaryKey::from("a")).unwrap().category, "x");
    }

    #[test]
    fn update_current_checks_key() {
        let store = seeded();
        let cursor = store.query_all().unwrap();

        let err = cursor.update_current(&record("b", "z", 9)).unwrap_err();
        assert_eq!(
            err,
            StoreError::KeyMismatch {
                expected: PrimaryKey::from("a"),
                found: PrimaryKey::from("b"),
            }
        );
        assert_eq!(store.read::<Record>(&PrimaryKey::from("b")).unwrap().category, "x");

        cursor.update_current(&record("a", "z", 9)).unwrap();
        assert_eq!(cursor.read::<Record>().unwrap().category, "z");
    }

    #[test]
    fn debug_format() {
        let store = seeded();
        let cursor = store.query_all().unwrap();
        let debug = format!("{cursor:?}");
        assert!(debug.contains("Cursor"));
        assert!(debug.contains("position"));
    }
}
