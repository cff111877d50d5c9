use std::sync::Arc;

use uuid::Uuid;

use crate::core::state::runtime::coordination::coordination_runtime_state::{
    CoordinationStage, TaskRecord, TaskStatus,
};
use crate::core::state::runtime::coordination::coordination_state_repository_trait::CoordinationStateRepositoryTrait;

/// Tracks every coordination task's lifetime and final status.
pub struct CoordinationStateManager<R: CoordinationStateRepositoryTrait> {
    pub(crate) repo: Arc<R>,
}

impl<R: CoordinationStateRepositoryTrait> CoordinationStateManager<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn begin(&self, task_id: Uuid, workload: &str, tag: &str) {
        self.repo.update(|state| state.begin(task_id, workload, tag)).await;
    }

    pub async fn advance(&self, task_id: Uuid, workload: &str, stage: CoordinationStage) {
        self.repo
            .update(|state| state.advance(task_id, workload, stage))
            .await;
    }

    pub async fn finish(&self, task_id: Uuid, workload: &str, status: TaskStatus) {
        self.repo
            .update(|state| state.finish(task_id, workload, status))
            .await;
    }

    pub async fn get(&self, workload: &str) -> Option<TaskRecord> {
        self.repo.get().await.tasks.get(workload).cloned()
    }

    /// All records, most recently started first.
    pub async fn list(&self) -> Vec<TaskRecord> {
        let state = self.repo.get().await;
        let mut records: Vec<TaskRecord> = state.tasks.values().cloned().collect();
        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        records
    }

    pub async fn running(&self) -> usize {
        self.repo.get().await.running()
    }
}
