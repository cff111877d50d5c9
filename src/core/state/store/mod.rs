pub mod state_store_trait;
pub mod redis_state_store;
#[cfg(test)]
pub mod memory_state_store;
