use async_trait::async_trait;

use crate::domain::rollout::model::{ReplicaStatus, Workload};
use crate::errors::PlatformError;

/// Read-only view of the workload orchestration platform.
#[async_trait]
pub trait OrchestrationPlatform: Send + Sync {
    /// Workloads in `namespace`. Entries whose running tag cannot be
    /// determined are returned as errors so the caller can skip them alone.
    async fn list_workloads(&self, namespace: &str) -> Result<Vec<Result<Workload, PlatformError>>, PlatformError>;

    async fn get_workload(&self, namespace: &str, name: &str) -> Result<Workload, PlatformError>;

    async fn list_replicas(&self, namespace: &str, selector: &str) -> Result<Vec<ReplicaStatus>, PlatformError>;

    /// Public hostname routed to the workload.
    async fn get_public_host(&self, namespace: &str, name: &str) -> Result<Option<String>, PlatformError>;
}
