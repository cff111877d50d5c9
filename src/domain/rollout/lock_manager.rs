use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::domain::rollout::model::lock_key;
use crate::errors::StoreError;

/// Safety net for tasks that die without releasing.
pub const LOCK_TTL: Duration = Duration::from_secs(30 * 60);

/// Per-workload mutual exclusion on top of the shared store's atomic
/// set-if-absent.
#[derive(Clone)]
pub struct LockManager {
    store: Arc<dyn SharedStateStore>,
    ttl: Duration,
}

impl LockManager {
    pub fn new(store: Arc<dyn SharedStateStore>) -> Self {
        Self::with_ttl(store, LOCK_TTL)
    }

    pub fn with_ttl(store: Arc<dyn SharedStateStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// True iff this call created the lock. `owner` is stored for diagnosis only.
    pub async fn try_acquire(&self, workload: &str, owner: &str) -> Result<bool, StoreError> {
        let acquired = self
            .store
            .set_if_absent(&lock_key(workload), owner, self.ttl)
            .await?;

        if acquired {
            debug!(workload = %workload, owner = %owner, "Acquired lock");
        } else {
            debug!(workload = %workload, "Lock already held");
        }
        Ok(acquired)
    }

    /// Unconditional delete.
    pub async fn release(&self, workload: &str) -> Result<(), StoreError> {
        debug!(workload = %workload, "Releasing lock");
        self.store.delete(&lock_key(workload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::store::memory_state_store::MemoryStateStore;
    use futures::future::join_all;

    #[tokio::test]
    async fn concurrent_acquires_have_exactly_one_winner() {
        let store = Arc::new(MemoryStateStore::new("local"));
        let locks = LockManager::new(store.clone());

        let attempts = (0..32).map(|i| {
            let locks = locks.clone();
            tokio::spawn(async move { locks.try_acquire("svc-a", &format!("task-{}", i)).await })
        });
        let results: Vec<bool> = join_all(attempts)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();

        assert_eq!(results.iter().filter(|won| **won).count(), 1);
        assert!(store.value("lock:svc-a").is_some());
    }

    #[tokio::test]
    async fn release_allows_reacquire() {
        let store = Arc::new(MemoryStateStore::new("local"));
        let locks = LockManager::new(store.clone());

        assert!(locks.try_acquire("svc-a", "t1").await.unwrap());
        assert!(!locks.try_acquire("svc-a", "t2").await.unwrap());
        locks.release("svc-a").await.unwrap();
        assert!(locks.try_acquire("svc-a", "t3").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_lock_can_be_taken_over() {
        let store = Arc::new(MemoryStateStore::new("local"));
        let locks = LockManager::new(store.clone());

        assert!(locks.try_acquire("svc-a", "crashed").await.unwrap());
        tokio::time::advance(LOCK_TTL + Duration::from_secs(1)).await;
        assert!(locks.try_acquire("svc-a", "t2").await.unwrap());
        assert_eq!(store.value("lock:svc-a").as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let store = Arc::new(MemoryStateStore::new("local"));
        store.set_unavailable(true);
        let locks = LockManager::new(store);

        assert!(locks.try_acquire("svc-a", "t1").await.is_err());
    }
}
