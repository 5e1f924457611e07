//! Core Stage trait definition

use crate::{FactStore, Result};
use async_trait::async_trait;

/// Capability interface implemented by every analysis stage
///
/// Stages form a closed set (technical, fundamental, sentiment, risk); the
/// orchestrator iterates over the fixed set rather than an open plugin
/// registry. A stage reads the raw fact for the ticker through the store,
/// derives its record, and persists that record under its own ticker-scoped
/// key before returning. The returned value is the persisted record
/// serialized to JSON; downstream consumers read from the store, never from
/// the return value.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Run the stage for one ticker against the shared store
    ///
    /// Returns the persisted record on success. A missing upstream fact or
    /// unusable input yields an error and leaves the store untouched; it
    /// must never panic.
    async fn run(&self, ticker: &str, store: &FactStore) -> Result<serde_json::Value>;

    /// Get the stage's name
    fn name(&self) -> &str;
}
