use std::sync::Arc;

use tracing::info;

use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::domain::rollout::model::{tag_record_key, TagClassification, Workload};
use crate::errors::StoreError;

/// Compares a workload's running tag with its stored tag record.
#[derive(Clone)]
pub struct TagChangeDetector {
    store: Arc<dyn SharedStateStore>,
}

impl TagChangeDetector {
    pub fn new(store: Arc<dyn SharedStateStore>) -> Self {
        Self { store }
    }

    /// A workload without a record is seeded with its current tag and never
    /// treated as a new rollout; that is the only write done here.
    pub async fn classify(&self, workload: &Workload) -> Result<TagClassification, StoreError> {
        let key = tag_record_key(&workload.name);

        match self.store.get(&key).await? {
            None => {
                info!(
                    workload = %workload.name,
                    tag = %workload.current_tag,
                    "First sighting, recording baseline tag"
                );
                self.store.set(&key, &workload.current_tag, None).await?;
                Ok(TagClassification::Baseline)
            }
            Some(stored) if stored == workload.current_tag => Ok(TagClassification::Unchanged),
            Some(stored) => Ok(TagClassification::Changed { previous: stored }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::store::memory_state_store::MemoryStateStore;

    fn workload(tag: &str) -> Workload {
        Workload {
            namespace: "web".into(),
            name: "svc-a".into(),
            current_tag: tag.into(),
            selector: "app=svc-a".into(),
        }
    }

    #[tokio::test]
    async fn first_sighting_seeds_baseline() {
        let store = Arc::new(MemoryStateStore::new("local"));
        let detector = TagChangeDetector::new(store.clone());

        assert_eq!(detector.classify(&workload("v1")).await.unwrap(), TagClassification::Baseline);
        assert_eq!(store.value("svc-a").as_deref(), Some("v1"));

        // seeded record makes the next tick a no-op
        assert_eq!(detector.classify(&workload("v1")).await.unwrap(), TagClassification::Unchanged);
    }

    #[tokio::test]
    async fn changed_tag_does_not_touch_record() {
        let store = Arc::new(MemoryStateStore::new("local"));
        store.insert("svc-a", "v1");
        let detector = TagChangeDetector::new(store.clone());

        assert_eq!(
            detector.classify(&workload("v2")).await.unwrap(),
            TagClassification::Changed { previous: "v1".into() }
        );
        assert_eq!(store.value("svc-a").as_deref(), Some("v1"));
    }
}
