use serde_json::Value;
use std::collections::HashMap;

use super::{KeyValueStore, StoreError};

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut store = MemoryStore::default();
        assert!(store.is_empty());
        store.set("k", Value::from(1)).unwrap();
        store.set("k", Value::from(2)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(Value::from(2)));
        assert_eq!(store.len(), 1);
    }
}
