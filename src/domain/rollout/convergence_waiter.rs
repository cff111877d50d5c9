use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::domain::rollout::model::tag_record_key;
use crate::domain::rollout::poller::{poll_until, PollOutcome, PollSchedule, Probe};
use crate::errors::CoordinationError;

pub const CONVERGENCE_SCHEDULE: PollSchedule =
    PollSchedule::new(Duration::from_secs(10), Duration::from_secs(120));

/// Waits for every peer cluster group to record the same tag, one peer at a
/// time in configured order. Peers are only ever read.
#[derive(Clone)]
pub struct ConvergenceWaiter {
    peers: Vec<Arc<dyn SharedStateStore>>,
    schedule: PollSchedule,
}

impl ConvergenceWaiter {
    pub fn new(peers: Vec<Arc<dyn SharedStateStore>>) -> Self {
        Self::with_schedule(peers, CONVERGENCE_SCHEDULE)
    }

    pub fn with_schedule(peers: Vec<Arc<dyn SharedStateStore>>, schedule: PollSchedule) -> Self {
        Self { peers, schedule }
    }

    /// Fails on the first peer that does not converge; no peers is an immediate success.
    ///
    /// A peer without any record for the workload is polled like one on an
    /// older tag, so it ends as `PeerTimeout` after the deadline rather than
    /// as an immediate `PeerReadError`. Only an unreachable peer is a read error.
    pub async fn wait(&self, workload: &str, tag: &str) -> Result<(), CoordinationError> {
        for peer in &self.peers {
            self.wait_for_peer(peer.as_ref(), workload, tag).await?;
            info!(workload = %workload, tag = %tag, peer = %peer.name(), "Peer converged");
        }
        Ok(())
    }

    async fn wait_for_peer(
        &self,
        peer: &dyn SharedStateStore,
        workload: &str,
        tag: &str,
    ) -> Result<(), CoordinationError> {
        let key = tag_record_key(workload);
        let key = key.as_str();

        let outcome = poll_until(self.schedule, || async move {
            debug!(workload = %workload, tag = %tag, peer = %peer.name(), "Waiting for rollout on peer");
            match peer.get(key).await {
                Ok(Some(seen)) if seen == tag => Ok(Probe::Ready(())),
                // absent means the peer has not seen this workload yet
                Ok(_) => Ok(Probe::Pending),
                Err(source) => Err(CoordinationError::PeerReadError {
                    peer: peer.name().to_string(),
                    workload: workload.to_string(),
                    source,
                }),
            }
        })
        .await;

        match outcome {
            PollOutcome::Ready(()) => Ok(()),
            PollOutcome::Failed(err) => Err(err),
            PollOutcome::TimedOut { .. } => Err(CoordinationError::PeerTimeout {
                peer: peer.name().to_string(),
                workload: workload.to_string(),
                tag: tag.to_string(),
            }),
        }
    }
}
