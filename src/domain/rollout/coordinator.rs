use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::cdn::cdn_provider_trait::CdnProvider;
use crate::core::platform::platform_trait::OrchestrationPlatform;
use crate::core::state::runtime::coordination::coordination_runtime_state::{CoordinationStage, TaskStatus};
use crate::core::state::runtime::coordination::CoordinationRegistry;
use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::domain::invalidation::invalidation_driver::{InvalidationDriver, InvalidationReceipt};
use crate::domain::rollout::convergence_waiter::ConvergenceWaiter;
use crate::domain::rollout::lock_manager::LockManager;
use crate::domain::rollout::model::tag_record_key;
use crate::domain::rollout::readiness_waiter::ReadinessWaiter;
use crate::domain::webhook::webhook_notifier::{CompletionNotifier, NotifyOutcome};
use crate::errors::{CoordinationError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinationSummary {
    pub receipt: InvalidationReceipt,
    pub notification: NotifyOutcome,
}

/// Final result of one coordination task.
#[derive(Debug)]
pub struct TaskReport {
    pub task_id: Uuid,
    pub workload: String,
    pub tag: String,
    pub result: Result<CoordinationSummary, CoordinationError>,
}

/// Runs the per-rollout sequence: readiness, tag write, peer convergence,
/// CDN invalidation and the completion webhook.
pub struct Coordinator {
    namespace: String,
    platform: Arc<dyn OrchestrationPlatform>,
    store: Arc<dyn SharedStateStore>,
    locks: LockManager,
    readiness: ReadinessWaiter,
    convergence: ConvergenceWaiter,
    invalidation: InvalidationDriver,
    notifier: CompletionNotifier,
    registry: Arc<CoordinationRegistry>,
}

impl Coordinator {
    pub fn new(
        namespace: &str,
        platform: Arc<dyn OrchestrationPlatform>,
        store: Arc<dyn SharedStateStore>,
        peers: Vec<Arc<dyn SharedStateStore>>,
        cdn: Arc<dyn CdnProvider>,
        notifier: CompletionNotifier,
        registry: Arc<CoordinationRegistry>,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            readiness: ReadinessWaiter::new(platform.clone()),
            locks: LockManager::new(store.clone()),
            convergence: ConvergenceWaiter::new(peers),
            invalidation: InvalidationDriver::new(cdn),
            platform,
            store,
            notifier,
            registry,
        }
    }

    /// Expects the workload's lock to be held on behalf of `task_id`; it is
    /// released as soon as readiness is decided.
    pub async fn run(&self, task_id: Uuid, workload: String, tag: String) -> TaskReport {
        self.registry.begin(task_id, &workload, &tag).await;
        info!(task_id = %task_id, workload = %workload, tag = %tag, "Coordination started");

        let result = self.coordinate(task_id, &workload, &tag).await;

        let status = match &result {
            Ok(summary) => {
                info!(
                    task_id = %task_id,
                    workload = %workload,
                    tag = %tag,
                    invalidation_id = %summary.receipt.invalidation_id,
                    "Coordination finished"
                );
                TaskStatus::Succeeded
            }
            Err(e) => match e.kind() {
                ErrorKind::Superseded => {
                    info!(task_id = %task_id, workload = %workload, tag = %tag, "{}", e);
                    TaskStatus::Superseded
                }
                ErrorKind::Timeout | ErrorKind::NotFound => {
                    warn!(task_id = %task_id, workload = %workload, tag = %tag, error = %e, "Coordination aborted");
                    TaskStatus::Failed(e.to_string())
                }
                ErrorKind::TransientInfra => {
                    error!(task_id = %task_id, workload = %workload, tag = %tag, error = %e, "Coordination aborted");
                    TaskStatus::Failed(e.to_string())
                }
            },
        };
        self.registry.finish(task_id, &workload, status).await;

        TaskReport {
            task_id,
            workload,
            tag,
            result,
        }
    }

    async fn coordinate(&self, task_id: Uuid, workload: &str, tag: &str) -> Result<CoordinationSummary, CoordinationError> {
        let ready = self.readiness.wait(&self.namespace, workload, tag).await;
        let recorded = match ready {
            Ok(()) => self
                .store
                .set(&tag_record_key(workload), tag, None)
                .await
                .map_err(CoordinationError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = self.locks.release(workload).await {
            // the TTL reclaims it
            error!(workload = %workload, error = %e, "Failed to release lock");
        }
        recorded?;
        info!(workload = %workload, tag = %tag, "Rollout ready, tag recorded");

        self.after_tag_recorded(task_id, workload, tag)
            .await
            .inspect_err(|e| {
                warn!(
                    workload = %workload,
                    tag = %tag,
                    error = %e,
                    "Tag recorded without a completed invalidation; the CDN may serve stale content until the next rollout"
                );
            })
    }

    async fn after_tag_recorded(&self, task_id: Uuid, workload: &str, tag: &str) -> Result<CoordinationSummary, CoordinationError> {
        self.registry.advance(task_id, workload, CoordinationStage::Convergence).await;
        self.convergence.wait(workload, tag).await?;

        self.registry.advance(task_id, workload, CoordinationStage::Resolving).await;
        let host = self
            .platform
            .get_public_host(&self.namespace, workload)
            .await?
            .ok_or_else(|| CoordinationError::MissingHost {
                workload: workload.to_string(),
            })?;
        let distribution_id = self.invalidation.resolve(&host).await?;

        self.registry.advance(task_id, workload, CoordinationStage::Invalidating).await;
        let receipt = self.invalidation.invalidate(&distribution_id, workload, tag).await?;

        self.registry.advance(task_id, workload, CoordinationStage::Notifying).await;
        let notification = self.notifier.notify(workload).await;

        Ok(CoordinationSummary { receipt, notification })
    }
}
