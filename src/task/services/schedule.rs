//! Daily trigger loop for the batch jobs.

use crate::task::domain::JobSchedule;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt::{Debug, Display};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Fires a batch job once per day at its scheduled wall time.
///
/// Each invocation is awaited before the next sleep, so a trigger never
/// overlaps itself in-process. Nothing prevents overlap between separately
/// deployed instances; that is an accepted operational risk.
pub struct JobTrigger<C>
where
    C: Clock + Send + Sync,
{
    name: &'static str,
    schedule: JobSchedule,
    clock: Arc<C>,
}

impl<C> JobTrigger<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a named trigger for a schedule.
    #[must_use]
    pub const fn new(name: &'static str, schedule: JobSchedule, clock: Arc<C>) -> Self {
        Self {
            name,
            schedule,
            clock,
        }
    }

    /// Returns how long to sleep from `now` until the next trigger instant.
    #[must_use]
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        (self.schedule.next_run_after(now) - now)
            .to_std()
            .unwrap_or_default()
    }

    /// Runs `job` once per scheduled occurrence, forever, logging each
    /// report or failure. Errors never stop the loop; a failed run is not
    /// retried before its next scheduled occurrence.
    pub async fn run_daily<J, Fut, R, E>(&self, job: J)
    where
        J: Fn() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: Debug,
        E: Display,
    {
        loop {
            let delay = self.delay_from(self.clock.utc());
            tokio::time::sleep(delay).await;

            match job().await {
                Ok(report) => info!(job = self.name, ?report, "scheduled run complete"),
                Err(err) => error!(job = self.name, %err, "scheduled run failed"),
            }
        }
    }
}
