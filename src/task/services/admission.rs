//! Reactive admission control for WIP-capped activations.
//!
//! The collaborator store has no pre-commit validation hook, so an
//! over-cap write is corrected after the fact: a disallowed creation is
//! deleted, a disallowed update is reverted to its prior snapshot. Both are
//! best-effort compensating actions, not transactions; the count-then-write
//! sequence is racy under concurrent admissions for the same owner and
//! priority, and cap enforcement is therefore best effort.

use crate::task::{
    domain::{OwnerId, Priority, TaskPatch, TaskStatus, WipLimits},
    ports::{CreateEvent, TaskQuery, TaskStore, TaskStoreError, TaskStoreResult, UpdateEvent},
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The event did not transition a task into `Active`, or the priority is
    /// uncapped.
    NotApplicable,
    /// The activation fits under the cap; the write stands.
    Admitted,
    /// The activation exceeded the cap and was compensated.
    RolledBack,
}

/// Reactive handler enforcing per-owner WIP caps on activations.
#[derive(Clone)]
pub struct AdmissionController<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    limits: WipLimits,
}

impl<S> AdmissionController<S>
where
    S: TaskStore,
{
    /// Creates an admission controller over a store with the given limits.
    #[must_use]
    pub const fn new(store: Arc<S>, limits: WipLimits) -> Self {
        Self { store, limits }
    }

    /// Processes a creation event, deleting the task when it was created
    /// directly into `Active` over the cap.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the count query or the compensating
    /// delete fails. A [`TaskStoreError::NotFound`] from the delete means the
    /// task vanished first; callers treat that as a skip.
    pub async fn process_create(&self, event: &CreateEvent) -> TaskStoreResult<AdmissionDecision> {
        let task = &event.task;
        if task.status() != TaskStatus::Active {
            return Ok(AdmissionDecision::NotApplicable);
        }
        let Some(limit) = self.limits.limit_for(task.priority()) else {
            return Ok(AdmissionDecision::NotApplicable);
        };

        // The document is already written, so the count includes it; the cap
        // is breached once the count passes the limit, with no +1 adjustment.
        let current = self.active_count(task.owner(), task.priority()).await?;
        if !exceeds(current, limit) {
            return Ok(AdmissionDecision::Admitted);
        }

        warn!(
            task_id = %task.id(),
            owner = %task.owner(),
            priority = task.priority().as_str(),
            current,
            limit,
            "over-cap creation, rolling back with delete"
        );
        self.store.delete(task.id()).await?;
        Ok(AdmissionDecision::RolledBack)
    }

    /// Processes an update event, reverting a transition into `Active` that
    /// would exceed the cap by restoring the pre-update snapshot verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the count query or the compensating
    /// write fails.
    pub async fn process_update(&self, event: &UpdateEvent) -> TaskStoreResult<AdmissionDecision> {
        let after = &event.after;
        let entered_active =
            after.status() == TaskStatus::Active && event.before.status() != TaskStatus::Active;
        if !entered_active {
            return Ok(AdmissionDecision::NotApplicable);
        }
        let Some(limit) = self.limits.limit_for(after.priority()) else {
            return Ok(AdmissionDecision::NotApplicable);
        };

        let current = self.active_count(after.owner(), after.priority()).await?;
        if !exceeds(current, limit) {
            return Ok(AdmissionDecision::Admitted);
        }

        warn!(
            task_id = %after.id(),
            owner = %after.owner(),
            priority = after.priority().as_str(),
            current,
            limit,
            "over-cap activation, reverting to prior snapshot"
        );
        self.store
            .update_fields(after.id(), TaskPatch::revert_to(&event.before))
            .await?;
        Ok(AdmissionDecision::RolledBack)
    }

    /// Event-pump entry point for creation events; failures are logged and
    /// swallowed because there is no channel back to the writer. A failed
    /// rollback leaves the offending state in place until the next human or
    /// scheduled correction.
    pub async fn handle_create(&self, event: &CreateEvent) {
        match self.process_create(event).await {
            Ok(decision) => debug!(task_id = %event.task.id(), ?decision, "admission create"),
            Err(TaskStoreError::NotFound(id)) => {
                warn!(task_id = %id, "task vanished during create admission, skipping");
            }
            Err(err) => {
                error!(task_id = %event.task.id(), %err, "create admission failed");
            }
        }
    }

    /// Event-pump entry point for update events; failures are logged and
    /// swallowed.
    pub async fn handle_update(&self, event: &UpdateEvent) {
        match self.process_update(event).await {
            Ok(decision) => debug!(task_id = %event.after.id(), ?decision, "admission update"),
            Err(TaskStoreError::NotFound(id)) => {
                warn!(task_id = %id, "task vanished during update admission, skipping");
            }
            Err(err) => {
                error!(task_id = %event.after.id(), %err, "update admission failed");
            }
        }
    }

    /// Counts active tasks for an owner and priority via a store query; the
    /// compound count is not protected by any cross-document lock.
    async fn active_count(&self, owner: &OwnerId, priority: Priority) -> TaskStoreResult<usize> {
        let query = TaskQuery::new()
            .with_owner(owner.clone())
            .with_status(TaskStatus::Active)
            .with_priority(priority);
        Ok(self.store.query(&query).await?.len())
    }
}

/// Whether an after-the-fact active count breaches a cap.
fn exceeds(current: usize, limit: u32) -> bool {
    u64::try_from(current).map_or(true, |count| count > u64::from(limit))
}
