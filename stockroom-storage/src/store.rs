use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageResult;

/// String key-value store.
///
/// Writes replace the whole stored object; a reader never observes half of a
/// multi-key update made through [`set_many`](KeyValueStore::set_many) or
/// [`remove_many`](KeyValueStore::remove_many).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, String)]) -> StorageResult<()>;

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()>;

    fn clear(&self) -> StorageResult<()>;

    fn is_empty(&self) -> bool;
}

/// Read and decode a JSON value. A missing key is `Ok(None)`; an undecodable
/// value is an error.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    store
        .get(key)
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(Into::into)
}

pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
