use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Key-value store for rendered pages. Entries live until they are
/// explicitly invalidated, so readers may see content that no longer matches
/// the datastore. The store is handed to the views that use it rather than
/// living in a process-wide global.
#[derive(Default)]
pub struct Cache {
    entries: RwLock<HashMap<String, Value>>,
}

impl Cache {
    pub fn new() -> Cache {
        Cache::default()
    }

    /// Returns the stored value for `key`, rendering and storing it first if
    /// there is none.
    pub fn get_or_render<F>(&self, key: &str, render: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        // A poisoned lock means some renderer panicked; the map itself is
        // still sound, so keep serving it.
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
        {
            return Ok(hit.clone());
        }
        tracing::debug!(%key, "cache miss");
        let value = render()?;
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_owned(), value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        tracing::debug!(%key, "cache invalidated");
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    pub fn clear(&self) {
        tracing::debug!("cache cleared");
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
