pub mod coordination_runtime_state;
pub mod coordination_state_repository_trait;
pub mod coordination_state_repository;
pub mod coordination_state_manager;

pub type CoordinationRegistry = coordination_state_manager::CoordinationStateManager<
    coordination_state_repository::CoordinationStateRepository,
>;
