pub mod model;
pub mod poller;
pub mod lock_manager;
pub mod tag_detector;
pub mod readiness_waiter;
pub mod convergence_waiter;
pub mod coordinator;
