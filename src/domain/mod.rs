pub mod invalidation;
pub mod rollout;
pub mod webhook;
