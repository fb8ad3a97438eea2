use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crud_index::{IndexError, IndexStore};
use crud_kv::{InMemoryKvStore, KvStore, PrefixStore};
use crud_metadata::MetadataStore;
use crud_objects::ObjectStore;
use crud_types::{BincodeCodec, Codec, KeyRange, Object, PrimaryKey, SecondaryKey};
use tracing::{debug, error, warn};

use crate::config::StoreConfig;
use crate::cursor::Cursor;
use crate::error::{CorruptionError, Operation, StoreError, StoreResult};

/// Sub-namespace holding object records.
pub const OBJECTS_PREFIX: u8 = 0x00;

/// Sub-namespace holding index postings.
pub const INDEXES_PREFIX: u8 = 0x01;

/// Sub-namespace holding metadata entries.
pub const METADATA_PREFIX: u8 = 0x02;

/// Indexed object store.
///
/// Composes an object store, an index store and a metadata store, each
/// under its own sub-namespace of the configured prefix, and keeps objects
/// and their secondary-key postings consistent across writes.
///
/// The backend offers no multi-key transactions, so consistency comes from
/// write ordering:
///
/// - **create** writes the object, then its postings. If indexing fails the
///   object is deleted again, along with any partial index entry; if either
///   removal fails, the store reports [`StoreError::Corruption`].
/// - **update** removes the old postings, adds the new ones, then rewrites
///   the object. Once the old postings are gone there is no way back, so any
///   later failure is corruption.
/// - **delete** removes the postings, then the object. A failure on the
///   object delete is corruption.
///
/// After reporting corruption the store halts: every later call, including
/// reads and cursor operations, fails with [`StoreError::Halted`].
///
/// Calls are expected to be serialized by the host; the store does no
/// locking of its own beyond what the backend provides.
pub struct Store<C: Codec = BincodeCodec> {
    config: StoreConfig,
    objects: ObjectStore<C>,
    indexes: IndexStore,
    metadata: MetadataStore,
    halted: AtomicBool,
}

impl Store<BincodeCodec> {
    /// A store over a fresh in-memory backend with the bincode codec.
    pub fn in_memory(config: StoreConfig) -> StoreResult<Self> {
        Self::new(Arc::new(InMemoryKvStore::new()), config, BincodeCodec)
    }
}

impl<C: Codec> Store<C> {
    /// Open a store over `kv`, namespaced under `config.prefix`.
    ///
    /// Records the schema version on first use; fails if the namespace was
    /// written with a different version.
    pub fn new(kv: Arc<dyn KvStore>, config: StoreConfig, codec: C) -> StoreResult<Self> {
        let root = PrefixStore::new(kv, config.prefix.clone());
        let codec = Arc::new(codec);

        let objects = ObjectStore::new(root.child(OBJECTS_PREFIX), codec)
            .with_type_verification(config.verify_types);
        let indexes = IndexStore::new(root.child(INDEXES_PREFIX));
        let metadata = MetadataStore::new(root.child(METADATA_PREFIX));
        metadata.init(config.schema_version)?;

        debug!(
            prefix = %String::from_utf8_lossy(&config.prefix),
            verify_types = config.verify_types,
            "store opened"
        );

        Ok(Self {
            config,
            objects,
            indexes,
            metadata,
            halted: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The metadata namespace of this store.
    ///
    /// Fails with `Halted` once the store has reported corruption.
    pub fn metadata(&self) -> StoreResult<&MetadataStore> {
        self.ensure_live()?;
        Ok(&self.metadata)
    }

    /// `true` once the store has reported corruption.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    // ---------------------------------------------------------------
    // CRUD
    // ---------------------------------------------------------------

    /// Store a new object and index it.
    ///
    /// Fails with `AlreadyExists` if the primary key is taken. The object is
    /// visible to reads and queries if and only if this returns `Ok`.
    pub fn create<T: Object>(&self, object: &T) -> StoreResult<()> {
        self.ensure_live()?;
        let pk = object.primary_key();
        self.objects.create(object)?;

        if let Err(err) = self.indexes.index(object) {
            warn!(pk = %pk, error = %err, "indexing failed; rolling back object record");
            let rollback = self
                .objects
                .delete(&pk)
                .map_err(|e| e.to_string())
                .and_then(|()| self.discard_partial_index(&pk, &err));
            if let Err(rollback) = rollback {
                return Err(self.corrupted(CorruptionError {
                    operation: Operation::Create,
                    primary_key: pk,
                    cause: err.to_string(),
                    rollback_cause: Some(rollback),
                }));
            }
            return Err(err.into());
        }

        debug!(pk = %pk, "object created");
        Ok(())
    }

    /// Remove index leftovers of a failed `create`.
    ///
    /// `AlreadyExists` means the entry belongs to someone else and is left
    /// alone. Otherwise a reverse entry still present for `pk` was written by
    /// this attempt.
    fn discard_partial_index(&self, pk: &PrimaryKey, cause: &IndexError) -> Result<(), String> {
        if matches!(cause, IndexError::AlreadyExists(_)) {
            return Ok(());
        }
        if self.indexes.is_indexed(pk).map_err(|e| e.to_string())? {
            warn!(pk = %pk, "removing partial index entry");
            self.indexes.delete(pk).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Read and decode the object stored at `pk`.
    pub fn read<T: Object>(&self, pk: &PrimaryKey) -> StoreResult<T> {
        self.ensure_live()?;
        Ok(self.objects.read(pk)?)
    }

    /// Replace an existing object and re-derive its postings.
    ///
    /// The old postings are looked up by primary key, so secondary keys may
    /// change freely. Fails with `NotFound` (and changes nothing) if the
    /// object is not indexed.
    pub fn update<T: Object>(&self, object: &T) -> StoreResult<()> {
        self.ensure_live()?;
        let pk = object.primary_key();
        self.indexes.delete(&pk)?;

        if let Err(err) = self.indexes.index(object) {
            return Err(self.corrupted(CorruptionError {
                operation: Operation::Update,
                primary_key: pk,
                cause: format!("reindexing failed: {err}"),
                rollback_cause: None,
            }));
        }
        if let Err(err) = self.objects.update(object) {
            return Err(self.corrupted(CorruptionError {
                operation: Operation::Update,
                primary_key: pk,
                cause: format!("object write failed: {err}"),
                rollback_cause: None,
            }));
        }

        debug!(pk = %pk, "object updated");
        Ok(())
    }

    /// Remove the object at `pk` together with its postings.
    ///
    /// Fails with `NotFound` (and changes nothing) if the key is unknown.
    pub fn delete(&self, pk: &PrimaryKey) -> StoreResult<()> {
        self.ensure_live()?;
        self.indexes.delete(pk)?;

        if let Err(err) = self.objects.delete(pk) {
            return Err(self.corrupted(CorruptionError {
                operation: Operation::Delete,
                primary_key: pk.clone(),
                cause: format!("object delete failed: {err}"),
                rollback_cause: None,
            }));
        }

        debug!(pk = %pk, "object deleted");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Snapshot the primary keys matching every key in `keys`.
    ///
    /// With no secondary keys, every stored object matches. `range` windows
    /// the result positionally; [`KeyRange::all`] means no bound. The
    /// returned cursor does not observe later writes.
    pub fn query(&self, keys: &[SecondaryKey], range: KeyRange) -> StoreResult<Cursor<'_, C>> {
        self.ensure_live()?;
        let pks = if keys.is_empty() {
            self.objects.get_all_keys(range)?
        } else {
            self.indexes.filter(keys, range)?
        };
        debug!(filters = keys.len(), %range, matches = pks.len(), "query");
        Ok(Cursor::new(self, pks))
    }

    /// Cursor over every stored object.
    pub fn query_all(&self) -> StoreResult<Cursor<'_, C>> {
        self.query(&[], KeyRange::all())
    }

    pub fn contains(&self, pk: &PrimaryKey) -> StoreResult<bool> {
        self.ensure_live()?;
        Ok(self.objects.contains(pk)?)
    }

    /// Secondary keys `pk` is currently indexed under.
    pub fn indexed_keys(&self, pk: &PrimaryKey) -> StoreResult<Vec<SecondaryKey>> {
        self.ensure_live()?;
        Ok(self.indexes.secondary_keys(pk)?)
    }

    // ---------------------------------------------------------------
    // Fatal channel
    // ---------------------------------------------------------------

    fn ensure_live(&self) -> StoreResult<()> {
        if self.is_halted() {
            return Err(StoreError::Halted);
        }
        Ok(())
    }

    fn corrupted(&self, corruption: CorruptionError) -> StoreError {
        self.halted.store(true, Ordering::SeqCst);
        error!(
            operation = %corruption.operation,
            pk = %corruption.primary_key,
            cause = %corruption.cause,
            rollback_cause = ?corruption.rollback_cause,
            "state corruption detected; store halted"
        );
        corruption.into()
    }
}

impl<C: Codec> std::fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("objects", &self.objects)
            .field("indexes", &self.indexes)
            .field("halted", &self.is_halted())
            .finish()
    }
}
