pub mod store;
pub mod runtime;
