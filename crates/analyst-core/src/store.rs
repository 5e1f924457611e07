//! Shared fact store for multi-stage collaboration
//!
//! The `FactStore` is the only shared mutable resource in a run: the fetcher
//! writes the raw fact, each stage writes its own record, and the aggregator
//! reads all of them. Every operation is atomic with respect to the others,
//! so a reader never observes a partial write. No cross-call transactions
//! are provided; no caller needs multi-key atomicity.
//!
//! The store is an explicitly constructed instance shared by `Arc`, not a
//! process-wide singleton. One store backs all stages within a run;
//! `clear()` resets it for reuse across runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe key/value memory for per-run facts and stage records
#[derive(Debug, Default)]
pub struct FactStore {
    state: Arc<RwLock<HashMap<String, Value>>>,
}

impl FactStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, overwriting any existing entry
    pub async fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut state = self.state.write().await;
        tracing::debug!("Saved to store: {key}");
        state.insert(key, value);
    }

    /// Get a cloned value, or `None` if the key is absent
    pub async fn get(&self, key: &str) -> Option<Value> {
        let state = self.state.read().await;
        state.get(key).cloned()
    }

    /// Merge a value into an existing entry
    ///
    /// Two JSON objects shallow-merge with incoming fields overwriting;
    /// two JSON arrays append; any other combination overwrites. A missing
    /// key behaves like `set`.
    pub async fn update(&self, key: impl Into<String>, value: Value) {
        let mut state = self.state.write().await;
        match state.entry(key.into()) {
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Object(existing), Value::Object(incoming)) => {
                    existing.extend(incoming);
                }
                (Value::Array(existing), Value::Array(mut incoming)) => {
                    existing.append(&mut incoming);
                }
                (existing, incoming) => *existing = incoming,
            },
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    /// Get a snapshot of the entire state
    pub async fn get_all(&self) -> HashMap<String, Value> {
        let state = self.state.read().await;
        state.clone()
    }

    /// Clear the state
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.clear();
    }

    /// Serialize a typed value and store it under `key`
    pub async fn set_typed<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize fact: {e}"))
        })?;
        self.set(key, json).await;
        Ok(())
    }

    /// Get a value and deserialize it into the requested type
    pub async fn get_typed<T: for<'de> Deserialize<'de>>(
        &self,
        key: &str,
    ) -> crate::Result<Option<T>> {
        match self.get(key).await {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value).map_err(|e| {
                    crate::Error::ProcessingFailed(format!("Failed to deserialize fact: {e}"))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists
    pub async fn contains_key(&self, key: &str) -> bool {
        let state = self.state.read().await;
        state.contains_key(key)
    }

    /// Get the number of entries
    pub async fn len(&self) -> usize {
        let state = self.state.read().await;
        state.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for FactStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}
