use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::key::{PrimaryKey, SecondaryKey};

/// A domain entity that can be persisted in the store.
///
/// Implementors provide a stable primary key, the secondary keys derived
/// from their current field values, and (through serde) their encoding.
/// Secondary keys are recomputed on every write, so they must be a pure
/// function of the object's fields.
pub trait Object: Serialize + DeserializeOwned {
    /// The unique key of this object. Must not change across updates.
    fn primary_key(&self) -> PrimaryKey;

    /// Queryable attributes of this object, in a stable order.
    fn secondary_keys(&self) -> Vec<SecondaryKey>;

    /// Type tag recorded alongside the object when type verification is on.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
