use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::state::runtime::coordination::coordination_runtime_state::CoordinationRuntimeState;
use crate::core::state::runtime::coordination::coordination_state_repository_trait::CoordinationStateRepositoryTrait;

#[derive(Default)]
pub struct CoordinationStateRepository {
    state: RwLock<Arc<CoordinationRuntimeState>>,
}

impl CoordinationStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl CoordinationStateRepositoryTrait for CoordinationStateRepository {
    /// Return the shared Arc snapshot (zero cost).
    async fn get(&self) -> Arc<CoordinationRuntimeState> {
        self.state.read().await.clone()
    }

    /// Copy-on-write so readers holding a snapshot are never blocked.
    async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut CoordinationRuntimeState) + Send,
    {
        let mut guard = self.state.write().await;
        let mut new_state = (**guard).clone();
        f(&mut new_state);
        *guard = Arc::new(new_state);
    }
}
