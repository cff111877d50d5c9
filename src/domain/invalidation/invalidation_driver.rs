use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::core::cdn::cdn_provider_trait::{CdnProvider, InvalidationTicket};
use crate::domain::invalidation::distribution_resolver::resolve_distribution_id;
use crate::domain::rollout::poller::{poll_until, PollOutcome, PollSchedule, Probe};
use crate::errors::{CdnError, CoordinationError};

pub const INVALIDATION_SCHEDULE: PollSchedule =
    PollSchedule::new(Duration::from_secs(30), Duration::from_secs(600)).probing_first();

/// Everything under the distribution.
pub const INVALIDATION_PATHS: [&str; 1] = ["/*"];

/// Stable per rollout, so a resubmission of the same rollout is identifiable.
pub fn caller_reference(workload: &str, tag: &str) -> String {
    format!("invalidation-id-{}-{}", workload, tag)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationReceipt {
    pub distribution_id: String,
    pub invalidation_id: String,
}

/// Submits a full invalidation and waits for the provider to finish it.
#[derive(Clone)]
pub struct InvalidationDriver {
    cdn: Arc<dyn CdnProvider>,
    schedule: PollSchedule,
}

impl InvalidationDriver {
    pub fn new(cdn: Arc<dyn CdnProvider>) -> Self {
        Self::with_schedule(cdn, INVALIDATION_SCHEDULE)
    }

    pub fn with_schedule(cdn: Arc<dyn CdnProvider>, schedule: PollSchedule) -> Self {
        Self { cdn, schedule }
    }

    pub async fn resolve(&self, host: &str) -> Result<String, CoordinationError> {
        resolve_distribution_id(self.cdn.as_ref(), host)
            .await
            .inspect_err(|e| log_provider_error("list_distributions", e))
    }

    /// Submits and then waits; completion is the only success.
    pub async fn invalidate(
        &self,
        distribution_id: &str,
        workload: &str,
        tag: &str,
    ) -> Result<InvalidationReceipt, CoordinationError> {
        let ticket = self.submit(distribution_id, workload, tag).await?;
        info!(
            workload = %workload,
            distribution_id = %distribution_id,
            invalidation_id = %ticket.id,
            "Submitted invalidation"
        );

        self.await_completion(distribution_id, &ticket).await?;
        info!(
            workload = %workload,
            distribution_id = %distribution_id,
            invalidation_id = %ticket.id,
            "Invalidation completed"
        );

        Ok(InvalidationReceipt {
            distribution_id: distribution_id.to_string(),
            invalidation_id: ticket.id,
        })
    }

    async fn submit(&self, distribution_id: &str, workload: &str, tag: &str) -> Result<InvalidationTicket, CoordinationError> {
        let paths: Vec<String> = INVALIDATION_PATHS.iter().map(|p| p.to_string()).collect();

        self.cdn
            .create_invalidation(distribution_id, &caller_reference(workload, tag), &paths)
            .await
            .map_err(CoordinationError::from)
            .inspect_err(|e| log_provider_error("create_invalidation", e))
    }

    async fn await_completion(&self, distribution_id: &str, ticket: &InvalidationTicket) -> Result<(), CoordinationError> {
        if ticket.status.is_completed() {
            return Ok(());
        }

        let outcome = poll_until(self.schedule, || async move {
            let status = self.cdn.get_invalidation(distribution_id, &ticket.id).await?;
            debug!(invalidation_id = %ticket.id, ?status, "Invalidation status");
            Ok::<_, CdnError>(if status.is_completed() {
                Probe::Ready(())
            } else {
                Probe::Pending
            })
        })
        .await;

        match outcome {
            PollOutcome::Ready(()) => Ok(()),
            PollOutcome::Failed(err) => {
                let err = CoordinationError::from(err);
                log_provider_error("get_invalidation", &err);
                Err(err)
            }
            PollOutcome::TimedOut { .. } => Err(CoordinationError::InvalidationTimeout {
                distribution_id: distribution_id.to_string(),
                invalidation_id: ticket.id.clone(),
            }),
        }
    }
}

fn log_provider_error(call: &str, err: &CoordinationError) {
    if let CoordinationError::Cdn(cdn) = err {
        error!(call = %call, code = %cdn.code, message = %cdn.message, "CDN provider call failed");
    }
}
