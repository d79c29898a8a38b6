//! Shared world state for daily triage BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Days, Local, TimeZone, Utc};
use heijunka::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{NewTask, OwnerId, Priority, TaskId, TaskStatus, WipLimits},
    ports::TaskStore,
    services::{DailyTriage, TriageReport},
};
use mockable::Clock;
use rstest::fixture;

/// Clock pinned to a fixed instant for deterministic scenario ages.
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

/// Scenario world for triage behaviour tests.
pub struct TriageWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub now: DateTime<Utc>,
    pub limits: Option<WipLimits>,
    pub labelled_tasks: HashMap<String, TaskId>,
    pub last_report: Option<TriageReport>,
}

impl TriageWorld {
    /// Creates a world with an empty store and no configured limits.
    pub fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            store: Arc::new(InMemoryTaskStore::new()),
            now,
            limits: None,
            labelled_tasks: HashMap::new(),
            last_report: None,
        }
    }

    /// Seeds a queued task and remembers it under a scenario label.
    pub fn seed_queued(
        &mut self,
        label: &str,
        owner: &str,
        priority: Priority,
        age_days: u32,
    ) -> Result<(), eyre::Report> {
        let owner = OwnerId::new(owner).map_err(|err| eyre::eyre!("invalid owner: {err}"))?;
        let created_on = self.now - Days::new(u64::from(age_days));
        let new = NewTask::new(owner, priority, &FixedClock(created_on))
            .with_status(TaskStatus::Queued)
            .with_created_on(created_on);
        let task = run_async(self.store.create(new))
            .map_err(|err| eyre::eyre!("seed task creation failed: {err}"))?;
        self.labelled_tasks.insert(label.to_owned(), task.id());
        Ok(())
    }

    /// Builds the triage job from the configured limits.
    pub fn triage(&self) -> Result<DailyTriage<InMemoryTaskStore>, eyre::Report> {
        let limits = self
            .limits
            .ok_or_else(|| eyre::eyre!("WIP limits not configured in scenario"))?;
        Ok(DailyTriage::new(Arc::clone(&self.store), limits))
    }

    /// Returns the current status of a labelled task.
    pub fn status_of(&self, label: &str) -> Result<TaskStatus, eyre::Report> {
        let id = self
            .labelled_tasks
            .get(label)
            .ok_or_else(|| eyre::eyre!("unknown task label: {label}"))?;
        let task = run_async(self.store.get(*id))
            .map_err(|err| eyre::eyre!("store lookup failed: {err}"))?
            .ok_or_else(|| eyre::eyre!("labelled task vanished: {label}"))?;
        Ok(task.status())
    }
}

impl Default for TriageWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TriageWorld {
    TriageWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
