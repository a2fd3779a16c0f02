use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// A key-value store write/read failure (for example quota exhaustion).
/// The cache treats every store failure as a miss, never as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("key-value store failure: {0}")]
pub struct StoreError(pub String);

/// The externally-provided text-only key-value store the cache sits on.
/// Single-key reads and writes are atomic; no multi-key transactions.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store with an optional byte quota, mirroring the constraints
/// of a browser localStorage collaborator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once total stored bytes would exceed
    /// `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError("store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        if let Some(quota) = self.quota_bytes {
            let current: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if current + key.len() + value.len() > quota {
                return Err(StoreError("quota exceeded".to_string()));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(8);
        assert!(store.set("k", "12345678901234567890").is_err());
        assert!(store.set("k", "v").is_ok());
        // Overwriting an existing key only counts the new value.
        assert!(store.set("k", "vvv").is_ok());
    }

    #[test]
    fn test_keys() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
