pub mod cdn;
pub mod client;
pub mod platform;
pub mod state;
pub mod webhook;
