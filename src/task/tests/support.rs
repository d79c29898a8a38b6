//! Shared helpers for engine unit tests.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use crate::task::adapters::memory::InMemoryTaskStore;
use crate::task::domain::{NewTask, OwnerId, Priority, Task, TaskStatus};
use crate::task::ports::TaskStore;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a fixed instant for deterministic stamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A fixed reference instant used across the engine tests.
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .expect("valid reference instant")
}

/// Builds a validated owner identifier.
pub fn owner(name: &str) -> OwnerId {
    OwnerId::new(name).expect("valid owner identifier")
}

/// Seeds a task with an explicit status and creation time.
pub async fn seed_task(
    store: &InMemoryTaskStore,
    owner_name: &str,
    priority: Priority,
    status: TaskStatus,
    created_on: DateTime<Utc>,
) -> Task {
    let new = NewTask::new(owner(owner_name), priority, &FixedClock(created_on))
        .with_status(status)
        .with_created_on(created_on);
    store.create(new).await.expect("seed task creation")
}
