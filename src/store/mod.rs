pub mod file;
pub mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Ordered list of group names.
pub const KEY_GROUP_ORDER: &str = "memo.groupOrder";
/// Name of the group the board last showed.
pub const KEY_ACTIVE_GROUP: &str = "memo.activeGroup";
/// Map of group name to its memos, newest first.
pub const KEY_MEMOS_BY_GROUP: &str = "memo.byGroup";
pub const KEY_GROUP_COLORS: &str = "memo.groupColors";
pub const KEY_GROUP_LOCKS: &str = "memo.groupLocks";
/// Stored memos that no longer decode, kept with their group name.
pub const KEY_UNREADABLE_MEMOS: &str = "memo.unreadable";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keyed JSON storage that survives restarts. Last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Read and decode `key`. A missing key is `Ok(None)`.
pub fn try_get<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encode `value` and write it under `key`.
pub fn put<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(key, serde_json::to_value(value)?)
}
