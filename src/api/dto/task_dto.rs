use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TaskSummaryResponse {
    pub tracked: usize,
    pub running: usize,
}
