//! Stale archival: retire queued tasks older than the retention threshold.

use super::commit_in_chunks;
use crate::task::{
    domain::{RetentionPolicy, TaskId, TaskPatch, TaskStatus},
    ports::{TaskQuery, TaskStore, TaskStoreError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Summary of one archival run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Queued tasks moved to `Archived`.
    pub tasks_archived: usize,
}

/// Once-per-day batch job retiring stale queued work, scheduled strictly
/// after the triage job.
///
/// Archived tasks never count toward any WIP cap and the engine never
/// transitions a task back out of `Archived`.
#[derive(Clone)]
pub struct StaleArchiver<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    policy: RetentionPolicy,
    clock: Arc<C>,
}

impl<S, C> StaleArchiver<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates an archiver over a store with the given retention policy.
    #[must_use]
    pub const fn new(store: Arc<S>, policy: RetentionPolicy, clock: Arc<C>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// Runs one archival pass. An empty selection is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the selection query or the batch
    /// commit fails.
    pub async fn run(&self) -> Result<ArchiveReport, TaskStoreError> {
        let cutoff = self.policy.cutoff(self.clock.utc());
        let stale = self
            .store
            .query(
                &TaskQuery::new()
                    .with_status(TaskStatus::Queued)
                    .created_before(cutoff),
            )
            .await?;

        if stale.is_empty() {
            return Ok(ArchiveReport::default());
        }

        let writes: Vec<(TaskId, TaskPatch)> = stale
            .iter()
            .map(|task| (task.id(), TaskPatch::status(TaskStatus::Archived)))
            .collect();
        let tasks_archived = writes.len();
        commit_in_chunks(self.store.as_ref(), writes).await?;

        info!(%cutoff, tasks_archived, "stale archival complete");
        Ok(ArchiveReport { tasks_archived })
    }
}
