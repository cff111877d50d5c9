use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Timing of one bounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    /// Measured from the moment polling starts.
    pub deadline: Duration,
    /// Probe once before the first sleep.
    pub probe_first: bool,
}

impl PollSchedule {
    pub const fn new(interval: Duration, deadline: Duration) -> Self {
        Self {
            interval,
            deadline,
            probe_first: false,
        }
    }

    pub const fn probing_first(mut self) -> Self {
        self.probe_first = true;
        self
    }
}

/// What a single probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Ready(T),
    Pending,
}

/// How a bounded wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T, E> {
    Ready(T),
    TimedOut { attempts: u32 },
    Failed(E),
}

/// Repeats `probe` on `schedule` until it is ready, fails, or the deadline passes.
///
/// A probe runs after each sleep; the deadline is checked after a pending
/// probe, so the last probe can land up to one interval past the deadline.
pub async fn poll_until<T, E, F, Fut>(schedule: PollSchedule, mut probe: F) -> PollOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>, E>>,
{
    let end = Instant::now() + schedule.deadline;
    let mut attempts = 0u32;
    let mut first = true;

    loop {
        if !(first && schedule.probe_first) {
            sleep(schedule.interval).await;
        }
        first = false;

        attempts += 1;
        match probe().await {
            Ok(Probe::Ready(value)) => return PollOutcome::Ready(value),
            Ok(Probe::Pending) => {}
            Err(err) => return PollOutcome::Failed(err),
        }

        if Instant::now() > end {
            return PollOutcome::TimedOut { attempts };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const SCHEDULE: PollSchedule = PollSchedule::new(Duration::from_secs(10), Duration::from_secs(120));

    #[tokio::test(start_paused = true)]
    async fn ready_after_a_few_probes() {
        let calls = &AtomicU32::new(0);
        let start = Instant::now();

        let outcome: PollOutcome<u32, ()> = poll_until(SCHEDULE, || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(if n == 3 { Probe::Ready(n) } else { Probe::Pending })
        })
        .await;

        assert_eq!(outcome, PollOutcome::Ready(3));
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_no_earlier_than_deadline() {
        let start = Instant::now();

        let outcome: PollOutcome<(), ()> = poll_until(SCHEDULE, || async { Ok(Probe::Pending) }).await;

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 13 });
        assert!(start.elapsed() >= Duration::from_secs(120));
        assert!(start.elapsed() <= Duration::from_secs(130));
    }

    #[tokio::test(start_paused = true)]
    async fn error_stops_polling_immediately() {
        let calls = &AtomicU32::new(0);

        let outcome: PollOutcome<(), &str> = poll_until(SCHEDULE, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("boom")
        })
        .await;

        assert_eq!(outcome, PollOutcome::Failed("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn probing_first_skips_initial_sleep() {
        let start = Instant::now();

        let outcome: PollOutcome<(), ()> =
            poll_until(SCHEDULE.probing_first(), || async { Ok(Probe::Ready(())) }).await;

        assert_eq!(outcome, PollOutcome::Ready(()));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
