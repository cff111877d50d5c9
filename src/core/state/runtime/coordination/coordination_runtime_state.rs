use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Where a coordination task currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationStage {
    Readiness,
    Convergence,
    Resolving,
    Invalidating,
    Notifying,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum TaskStatus {
    Running,
    Succeeded,
    Superseded,
    Failed(String),
}

/// Latest coordination task for one workload.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub task_id: Uuid,
    pub workload: String,
    pub tag: String,
    pub stage: CoordinationStage,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// In-memory view of coordination tasks, keyed by workload name.
///
/// Only the most recent task per workload is kept; it is replaced when a
/// newer rollout of the same workload starts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoordinationRuntimeState {
    pub tasks: HashMap<String, TaskRecord>,
}

impl CoordinationRuntimeState {
    pub fn begin(&mut self, task_id: Uuid, workload: &str, tag: &str) {
        self.tasks.insert(
            workload.to_string(),
            TaskRecord {
                task_id,
                workload: workload.to_string(),
                tag: tag.to_string(),
                stage: CoordinationStage::Readiness,
                status: TaskStatus::Running,
                started_at: Utc::now(),
                finished_at: None,
            },
        );
    }

    /// Updates stage of `task_id` only; a stale task never overwrites a newer record.
    pub fn advance(&mut self, task_id: Uuid, workload: &str, stage: CoordinationStage) {
        if let Some(record) = self.current_mut(task_id, workload) {
            record.stage = stage;
        }
    }

    pub fn finish(&mut self, task_id: Uuid, workload: &str, status: TaskStatus) {
        if let Some(record) = self.current_mut(task_id, workload) {
            if status == TaskStatus::Succeeded {
                record.stage = CoordinationStage::Done;
            }
            record.status = status;
            record.finished_at = Some(Utc::now());
        }
    }

    pub fn running(&self) -> usize {
        self.tasks
            .values()
            .filter(|r| r.status == TaskStatus::Running)
            .count()
    }

    fn current_mut(&mut self, task_id: Uuid, workload: &str) -> Option<&mut TaskRecord> {
        self.tasks
            .get_mut(workload)
            .filter(|record| record.task_id == task_id)
    }
}
