pub mod webhook_sender;
pub mod webhook_notifier;
