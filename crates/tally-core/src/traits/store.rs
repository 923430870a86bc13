use crate::error::{Result, TallyError};
use crate::types::keys::{entity_key, kind_prefix, prefix_end};
use crate::types::EntityKind;
use serde::{de::DeserializeOwned, Serialize};

/// A record persisted in the entity store
///
/// Entities are stored independently under `"{kind}/{id}"`; relations are
/// kept as stored ids, never enforced by the store.
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// Storage id of this record
    fn id(&self) -> String;
}

/// Read access to the entity store
pub trait EntityRead {
    /// Load the raw value stored under `key`
    fn get_state(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Ordered scan over `[start, end)`; an absent `end` scans to the last key
    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Ordered scan over every key starting with `prefix`
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let end = prefix_end(prefix);
        self.scan_range(prefix, end.as_deref())
    }
}

/// Write access to the entity store
///
/// Implementations are single-writer: the projector holds the only mutable
/// handle while an event is being applied.
pub trait EntityStore: EntityRead {
    /// Overwrite the value stored under `key`
    fn put_state(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn del_state(&mut self, key: &[u8]) -> Result<()>;
}

/// Typed reads on top of [`EntityRead`]
pub trait EntityReadExt: EntityRead {
    fn load<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        match self.get_state(&entity_key(E::KIND, id))? {
            Some(bytes) => decode::<E>(id, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn contains<E: Entity>(&self, id: &str) -> Result<bool> {
        Ok(self.get_state(&entity_key(E::KIND, id))?.is_some())
    }

    /// Every record of a kind, in key order
    fn scan<E: Entity>(&self) -> Result<Vec<E>> {
        let prefix = kind_prefix(E::KIND);
        self.scan_prefix(&prefix)?
            .into_iter()
            .map(|(key, bytes)| decode::<E>(&String::from_utf8_lossy(&key), &bytes))
            .collect()
    }
}

impl<T: EntityRead + ?Sized> EntityReadExt for T {}

/// Typed writes on top of [`EntityStore`]
pub trait EntityStoreExt: EntityStore {
    fn save<E: Entity>(&mut self, entity: &E) -> Result<()> {
        let bytes = serde_json::to_vec(entity)?;
        self.put_state(&entity_key(E::KIND, &entity.id()), &bytes)
    }

    /// Delete a record, reporting whether it existed
    fn remove<E: Entity>(&mut self, id: &str) -> Result<bool> {
        let key = entity_key(E::KIND, id);
        if self.get_state(&key)?.is_none() {
            return Ok(false);
        }
        self.del_state(&key)?;
        Ok(true)
    }
}

impl<T: EntityStore + ?Sized> EntityStoreExt for T {}

fn decode<E: Entity>(id: &str, bytes: &[u8]) -> Result<E> {
    serde_json::from_slice(bytes)
        .map_err(|e| TallyError::Serialization(format!("{} {}: {}", E::KIND, id, e)))
}
