//! Completion timestamp recording.

use crate::task::{
    domain::{TaskPatch, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult, UpdateEvent},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of one completion-stamp check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// The event was not a transition into `Done`.
    NotApplicable,
    /// A completion timestamp already exists; redelivery left it untouched.
    AlreadyStamped,
    /// The completion timestamp was written.
    Stamped(DateTime<Utc>),
}

/// Reactive handler stamping `completed_on` when a task transitions into
/// `Done`.
///
/// Stamping is idempotent: the recorder re-reads the document and skips when
/// a timestamp is already present, so at-least-once redelivery of the same
/// transition never moves an existing stamp.
#[derive(Clone)]
pub struct CompletionRecorder<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> CompletionRecorder<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a completion recorder over a store and clock.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Processes an update event, stamping `completed_on` on a non-`Done` →
    /// `Done` transition.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the re-read or the stamping write
    /// fails; [`TaskStoreError::NotFound`] means the task vanished between
    /// the event and the write.
    pub async fn process_update(&self, event: &UpdateEvent) -> TaskStoreResult<StampOutcome> {
        let completed = event.after.status() == TaskStatus::Done
            && event.before.status() != TaskStatus::Done;
        if !completed {
            return Ok(StampOutcome::NotApplicable);
        }

        let id = event.after.id();
        let current = self
            .store
            .get(id)
            .await?
            .ok_or(TaskStoreError::NotFound(id))?;
        if current.completed_on().is_some() {
            return Ok(StampOutcome::AlreadyStamped);
        }

        let stamped_at = self.clock.utc();
        self.store
            .update_fields(id, TaskPatch::completed_on(stamped_at))
            .await?;
        Ok(StampOutcome::Stamped(stamped_at))
    }

    /// Event-pump entry point; failures are logged and swallowed.
    pub async fn handle_update(&self, event: &UpdateEvent) {
        match self.process_update(event).await {
            Ok(outcome) => debug!(task_id = %event.after.id(), ?outcome, "completion check"),
            Err(TaskStoreError::NotFound(id)) => {
                warn!(task_id = %id, "task vanished before completion stamp, skipping");
            }
            Err(err) => {
                error!(task_id = %event.after.id(), %err, "completion stamping failed");
            }
        }
    }
}
