pub mod webhook_config_entity;
pub mod webhook_registry;
