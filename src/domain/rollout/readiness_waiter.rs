use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::platform::platform_trait::OrchestrationPlatform;
use crate::domain::rollout::poller::{poll_until, PollOutcome, PollSchedule, Probe};
use crate::errors::CoordinationError;

pub const READINESS_SCHEDULE: PollSchedule =
    PollSchedule::new(Duration::from_secs(10), Duration::from_secs(120));

/// Waits until every replica of a workload is ready on the triggering tag.
#[derive(Clone)]
pub struct ReadinessWaiter {
    platform: Arc<dyn OrchestrationPlatform>,
    schedule: PollSchedule,
}

impl ReadinessWaiter {
    pub fn new(platform: Arc<dyn OrchestrationPlatform>) -> Self {
        Self::with_schedule(platform, READINESS_SCHEDULE)
    }

    pub fn with_schedule(platform: Arc<dyn OrchestrationPlatform>, schedule: PollSchedule) -> Self {
        Self { platform, schedule }
    }

    pub async fn wait(&self, namespace: &str, name: &str, tag: &str) -> Result<(), CoordinationError> {
        let outcome = poll_until(self.schedule, || self.probe(namespace, name, tag)).await;

        match outcome {
            PollOutcome::Ready(()) => Ok(()),
            PollOutcome::Failed(err) => Err(err),
            PollOutcome::TimedOut { attempts } => {
                debug!(workload = %name, tag = %tag, attempts, "Readiness wait timed out");
                Err(CoordinationError::ReadinessTimeout {
                    workload: name.to_string(),
                    tag: tag.to_string(),
                })
            }
        }
    }

    async fn probe(&self, namespace: &str, name: &str, tag: &str) -> Result<Probe<()>, CoordinationError> {
        // A newer rollout makes this task's result meaningless.
        let workload = self.platform.get_workload(namespace, name).await?;
        if workload.current_tag != tag {
            return Err(CoordinationError::Superseded {
                workload: name.to_string(),
                expected: tag.to_string(),
                found: workload.current_tag,
            });
        }

        let replicas = self.platform.list_replicas(namespace, &workload.selector).await?;
        if replicas.is_empty() {
            return Err(CoordinationError::NoReplicas {
                workload: name.to_string(),
                selector: workload.selector,
            });
        }

        let pending: Vec<&str> = replicas
            .iter()
            .filter(|r| !r.is_ready_for(tag))
            .map(|r| r.name.as_str())
            .collect();

        if pending.is_empty() {
            Ok(Probe::Ready(()))
        } else {
            debug!(workload = %name, tag = %tag, ?pending, "Waiting on replicas");
            Ok(Probe::Pending)
        }
    }
}
