use std::sync::Arc;

use crate::core::state::runtime::coordination::CoordinationRegistry;

#[derive(Clone)]
pub struct AppState {
    pub coordination: Arc<CoordinationRegistry>,
}

pub fn build_app_state(coordination: Arc<CoordinationRegistry>) -> AppState {
    AppState { coordination }
}
