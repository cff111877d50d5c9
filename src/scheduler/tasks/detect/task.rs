use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::platform::platform_trait::OrchestrationPlatform;
use crate::domain::rollout::coordinator::{Coordinator, TaskReport};
use crate::domain::rollout::lock_manager::LockManager;
use crate::domain::rollout::model::TagClassification;
use crate::domain::rollout::tag_detector::TagChangeDetector;
use crate::errors::PlatformError;

/// What the detection tick needs, shared across ticks.
#[derive(Clone)]
pub struct DetectionContext {
    pub namespace: String,
    pub platform: Arc<dyn OrchestrationPlatform>,
    pub detector: TagChangeDetector,
    pub locks: LockManager,
    pub coordinator: Arc<Coordinator>,
}

/// Per-tick counters, mostly for logging.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickSummary {
    pub baseline: usize,
    pub unchanged: usize,
    pub started: Vec<String>,
    /// Changed workloads whose lock was already held elsewhere.
    pub locked: Vec<String>,
    pub skipped: usize,
    /// Tasks that finished since the previous tick.
    pub reaped: usize,
}

/// One detection pass over the namespace. Only a listing failure aborts the
/// pass; anything else skips the affected workload alone.
pub async fn run(ctx: &DetectionContext, tasks: &mut JoinSet<TaskReport>) -> Result<TickSummary, PlatformError> {
    let workloads = ctx.platform.list_workloads(&ctx.namespace).await?;
    let mut summary = TickSummary::default();

    for entry in workloads {
        let workload = match entry {
            Ok(workload) => workload,
            Err(e) => {
                warn!(error = %e, "Skipping workload");
                summary.skipped += 1;
                continue;
            }
        };

        let previous = match ctx.detector.classify(&workload).await {
            Ok(TagClassification::Baseline) => {
                summary.baseline += 1;
                continue;
            }
            Ok(TagClassification::Unchanged) => {
                summary.unchanged += 1;
                continue;
            }
            Ok(TagClassification::Changed { previous }) => previous,
            Err(e) => {
                error!(workload = %workload.name, error = %e, "Failed to read tag record");
                summary.skipped += 1;
                continue;
            }
        };

        let task_id = Uuid::new_v4();
        match ctx.locks.try_acquire(&workload.name, &task_id.to_string()).await {
            Ok(true) => {
                info!(
                    task_id = %task_id,
                    workload = %workload.name,
                    previous = %previous,
                    tag = %workload.current_tag,
                    "Tag change detected"
                );
                summary.started.push(workload.name.clone());

                let coordinator = ctx.coordinator.clone();
                tasks.spawn(async move {
                    coordinator
                        .run(task_id, workload.name, workload.current_tag)
                        .await
                });
            }
            Ok(false) => {
                debug!(workload = %workload.name, "Coordination already in progress");
                summary.locked.push(workload.name);
            }
            Err(e) => {
                error!(workload = %workload.name, error = %e, "Failed to acquire lock");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}
