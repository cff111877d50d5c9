use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::errors::StoreError;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now < at).unwrap_or(true)
    }
}

/// In-process store with per-entry expiry, driven by tokio's clock so
/// paused-time tests can expire locks.
pub struct MemoryStateStore {
    name: String,
    entries: Mutex<HashMap<String, Entry>>,
    unavailable: AtomicBool,
}

impl MemoryStateStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Seeds a non-expiring entry.
    pub fn insert(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    pub fn value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone())
    }

    /// Makes every subsequent call fail until flipped back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                store: self.name.clone(),
                message: "connection refused".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SharedStateStore for MemoryStateStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.check_available()?;
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.check_available()?;
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        if entries.get(key).map(|e| e.is_live(now)).unwrap_or(false) {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn set_if_absent_respects_expiry() {
        let store = MemoryStateStore::new("local");

        assert!(store.set_if_absent("lock:svc-a", "t1", Duration::from_secs(5)).await.unwrap());
        assert!(!store.set_if_absent("lock:svc-a", "t2", Duration::from_secs(5)).await.unwrap());

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(store.get("lock:svc-a").await.unwrap(), None);
        assert!(store.set_if_absent("lock:svc-a", "t3", Duration::from_secs(5)).await.unwrap());
        assert_eq!(store.value("lock:svc-a").as_deref(), Some("t3"));
    }
}
