//! Read-through text cache.
//!
//! The first `get` for a name reads the backing store and remembers the
//! answer, absence included. Absence is never re-checked against the store,
//! so every write of a cached name must go through [`TextCache::put`] to keep
//! the cache coherent.

use crate::Store;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime cache in front of a [`Store`]. No eviction.
pub struct TextCache {
    store: Arc<dyn Store>,
    entries: RwLock<HashMap<String, Option<String>>>,
}

impl TextCache {
    /// Create an empty cache over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Get the text for `name`, reading the store on first access.
    pub async fn get(&self, name: &str) -> Option<String> {
        if let Some(cached) = self.entries.read().await.get(name) {
            return cached.clone();
        }

        let loaded = match self.store.read(name) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(name, error = %e, "store read failed");
                return None;
            }
        };

        let mut entries = self.entries.write().await;
        entries
            .entry(name.to_string())
            .or_insert(loaded)
            .clone()
    }

    /// Check whether `name` holds a record.
    pub async fn contains(&self, name: &str) -> bool {
        self.get(name).await.is_some()
    }

    /// Write `text` through to the store and refresh the cached entry.
    ///
    /// Returns `true` if the store accepted the write.
    pub async fn put(&self, name: &str, text: &str) -> bool {
        match self.store.write(name, text) {
            Ok(true) => {
                self.entries
                    .write()
                    .await
                    .insert(name.to_string(), Some(text.to_string()));
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(name, error = %e, "store write failed");
                false
            }
        }
    }

    /// Delete `name` from the store and remember its absence.
    pub async fn remove(&self, name: &str) {
        if let Err(e) = self.store.remove(name) {
            tracing::warn!(name, error = %e, "store remove failed");
            self.entries.write().await.remove(name);
            return;
        }
        self.entries.write().await.insert(name.to_string(), None);
    }

    /// Number of cached names (present or absent).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for TextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCache").finish_non_exhaustive()
    }
}
