use std::time::Duration;

use async_trait::async_trait;

use crate::errors::StoreError;

/// Key-value substrate shared by every cluster group.
///
/// Holds the last confirmed tag per workload (keyed by the bare workload name)
/// and the per-workload lock entries.
#[async_trait]
pub trait SharedStateStore: Send + Sync {
    /// Identity used in logs and errors, e.g. `redis-b:6379`.
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value`; with `ttl` the entry expires on its own.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically writes `value` only when `key` is absent or expired.
    /// Returns whether this call created the entry.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError>;
}
