use std::sync::Arc;

use async_trait::async_trait;

use crate::core::state::runtime::coordination::coordination_runtime_state::CoordinationRuntimeState;

#[async_trait]
pub trait CoordinationStateRepositoryTrait: Send + Sync {
    /// Return the current state as an Arc snapshot.
    async fn get(&self) -> Arc<CoordinationRuntimeState>;

    /// Mutate the internal state using a closure.
    async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut CoordinationRuntimeState) + Send;
}
