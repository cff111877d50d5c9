//! Detection loop and supervision of the coordination tasks it starts.

pub mod tasks;

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::rollout::coordinator::TaskReport;
use crate::scheduler::tasks::detect::task::{DetectionContext, TickSummary};

pub struct DetectionScheduler {
    context: DetectionContext,
    interval: Duration,
    tasks: JoinSet<TaskReport>,
}

impl DetectionScheduler {
    pub fn new(context: DetectionContext, interval: Duration) -> Self {
        Self {
            context,
            interval,
            tasks: JoinSet::new(),
        }
    }

    /// Ticks until `shutdown` flips; tasks still running are aborted and
    /// their locks left to expire.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(namespace = %self.context.namespace, interval = ?self.interval, "Detection loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.changed() => break,
            }
        }

        if !self.tasks.is_empty() {
            warn!(in_flight = self.tasks.len(), "Stopping with coordination tasks in flight");
        }
        self.tasks.shutdown().await;
        info!("Detection loop stopped");
    }

    pub async fn tick(&mut self) -> Option<TickSummary> {
        let reaped = self.reap_finished();
        for report in &reaped {
            log_report(report);
        }

        match tasks::detect::task::run(&self.context, &mut self.tasks).await {
            Ok(mut summary) => {
                summary.reaped = reaped.len();
                debug!(
                    reaped = summary.reaped,
                    baseline = summary.baseline,
                    unchanged = summary.unchanged,
                    started = summary.started.len(),
                    locked = summary.locked.len(),
                    skipped = summary.skipped,
                    "Detection tick done"
                );
                Some(summary)
            }
            Err(e) => {
                error!(error = %e, "Failed to list workloads, skipping tick");
                None
            }
        }
    }

    /// Collects tasks that already finished without waiting on the rest.
    fn reap_finished(&mut self) -> Vec<TaskReport> {
        let mut reports = Vec::new();
        while let Some(joined) = self.tasks.try_join_next() {
            collect(joined, &mut reports);
        }
        reports
    }

    /// Waits for every running task.
    #[cfg(test)]
    pub async fn drain(&mut self) -> Vec<TaskReport> {
        let mut reports = Vec::new();
        while let Some(joined) = self.tasks.join_next().await {
            collect(joined, &mut reports);
        }
        reports
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

fn log_report(report: &TaskReport) {
    match &report.result {
        Ok(summary) => debug!(
            task_id = %report.task_id,
            workload = %report.workload,
            tag = %report.tag,
            invalidation_id = %summary.receipt.invalidation_id,
            notification = ?summary.notification,
            "Reaped finished coordination task"
        ),
        Err(e) => debug!(
            task_id = %report.task_id,
            workload = %report.workload,
            tag = %report.tag,
            error = %e,
            "Reaped failed coordination task"
        ),
    }
}

fn collect(joined: Result<TaskReport, tokio::task::JoinError>, reports: &mut Vec<TaskReport>) {
    match joined {
        Ok(report) => reports.push(report),
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!(error = %e, "Coordination task panicked"),
    }
}
