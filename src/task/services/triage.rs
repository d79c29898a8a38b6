//! Daily triage: demote unfinished active work, then promote queued work
//! fairly per owner under the WIP limits.

use super::commit_in_chunks;
use crate::task::{
    domain::{OwnerId, Priority, Task, TaskId, TaskPatch, TaskStatus, WipLimits},
    ports::{TaskQuery, TaskStore, TaskStoreError},
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Summary of one triage run, suitable for logging or persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriageReport {
    /// Active tasks demoted back to `Queued` in the demotion phase.
    pub tasks_moved_to_queued: usize,
    /// Queued tasks promoted to `Active` in the promotion phase.
    pub tasks_promoted: usize,
    /// Tasks examined across both phases.
    pub tasks_processed: usize,
}

/// Errors aborting a triage run. The failing phase is named so operators can
/// tell whether the demotion batch committed before the run stopped.
#[derive(Debug, Clone, Error)]
pub enum TriageError {
    /// The demotion phase failed; nothing was promoted.
    #[error("triage demotion phase failed: {0}")]
    Demotion(#[source] TaskStoreError),

    /// The promotion phase failed; committed demotions stand.
    #[error("triage promotion phase failed: {0}")]
    Promotion(#[source] TaskStoreError),
}

/// Once-per-day batch job levelling each owner's active work.
///
/// A run is a read-snapshot/compute/write-batch sequence with no
/// cross-document transaction; tasks written between the read and the batch
/// are not reflected in that run's decisions. There is no retry and no
/// atomicity across the two phases.
#[derive(Clone)]
pub struct DailyTriage<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    limits: WipLimits,
}

impl<S> DailyTriage<S>
where
    S: TaskStore,
{
    /// Creates a triage job over a store with the given limits.
    #[must_use]
    pub const fn new(store: Arc<S>, limits: WipLimits) -> Self {
        Self { store, limits }
    }

    /// Runs one triage pass and returns its summary.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError`] naming the phase that failed. A promotion
    /// failure does not re-attempt or undo the demotion phase.
    pub async fn run(&self) -> Result<TriageReport, TriageError> {
        let active = self
            .store
            .query(&TaskQuery::new().with_status(TaskStatus::Active))
            .await
            .map_err(TriageError::Demotion)?;

        // A task can never be both Active and Done; the guard is defensive.
        let demotions: Vec<(TaskId, TaskPatch)> = active
            .iter()
            .filter(|task| task.status() != TaskStatus::Done)
            .map(|task| (task.id(), TaskPatch::status(TaskStatus::Queued)))
            .collect();
        let tasks_moved_to_queued = demotions.len();
        commit_in_chunks(self.store.as_ref(), demotions)
            .await
            .map_err(TriageError::Demotion)?;

        let queued = self
            .store
            .query(
                &TaskQuery::new()
                    .with_status(TaskStatus::Queued)
                    .order_by_created_on(),
            )
            .await
            .map_err(TriageError::Promotion)?;

        let promotions = plan_promotions(&queued, self.limits);
        let tasks_promoted = promotions.len();
        commit_in_chunks(self.store.as_ref(), promotions)
            .await
            .map_err(TriageError::Promotion)?;

        let report = TriageReport {
            tasks_moved_to_queued,
            tasks_promoted,
            tasks_processed: tasks_moved_to_queued + queued.len(),
        };
        info!(
            moved_to_queued = report.tasks_moved_to_queued,
            promoted = report.tasks_promoted,
            processed = report.tasks_processed,
            "triage run complete"
        );
        Ok(report)
    }
}

/// Selects the queued tasks to promote, oldest first per owner and priority
/// band, up to each band's cap. `P3`/`P4` are never auto-promoted.
///
/// `queued` must already be ordered ascending by creation time (ties broken
/// by task id); the returned writes keep that order.
fn plan_promotions(queued: &[Task], limits: WipLimits) -> Vec<(TaskId, TaskPatch)> {
    let mut taken: HashMap<(OwnerId, Priority), u64> = HashMap::new();
    let mut promotions = Vec::new();

    for task in queued {
        let Some(limit) = limits.limit_for(task.priority()) else {
            continue;
        };
        let counter = taken
            .entry((task.owner().clone(), task.priority()))
            .or_insert(0);
        if *counter >= u64::from(limit) {
            continue;
        }
        *counter += 1;
        promotions.push((task.id(), TaskPatch::status(TaskStatus::Active)));
    }
    promotions
}
