//! In-process object store.
//!
//! Backs tests that need to inspect what was uploaded.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{ObjectStore, StorageError, StoredObject};

#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    content_type: String,
}

/// Object store that keeps everything in a `HashMap`.
pub struct MemoryStore {
    base_url: String,
    objects: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// `base_url` is only used to build public URLs.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Stored bytes and content type for `key`.
    pub fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .read()
            .ok()?
            .get(key)
            .map(|e| (e.bytes.clone(), e.content_type.clone()))
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory://local")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let size_bytes = bytes.len() as u64;
        let mut objects = self
            .objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if objects.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        objects.insert(
            key.to_string(),
            Entry {
                bytes,
                content_type: content_type.to_string(),
            },
        );

        Ok(StoredObject {
            key: key.to_string(),
            public_url: self.public_url(key),
            content_type: content_type.to_string(),
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut objects = self
            .objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryStore::new("http://files.local/");
        let stored = store.put("a/b.png", vec![9, 9], "image/png").await.unwrap();

        assert_eq!(stored.public_url, "http://files.local/a/b.png");
        assert_eq!(store.get("a/b.png"), Some((vec![9, 9], "image/png".to_string())));
        assert_eq!(store.keys(), vec!["a/b.png"]);

        let err = store.put("a/b.png", vec![1], "image/png").await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(ref k) if k == "a/b.png"));
        assert_eq!(store.get("a/b.png"), Some((vec![9, 9], "image/png".to_string())));

        store.delete("a/b.png").await.unwrap();
        assert!(store.is_empty());
        assert!(store.delete("a/b.png").await.is_err());
    }
}
