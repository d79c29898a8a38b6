//! Store port for task persistence, lookup, and batch mutation.

use crate::task::domain::{NewTask, Task, TaskId, TaskPatch};
use crate::task::domain::{OwnerId, Priority, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Filter and ordering parameters for a task query.
///
/// A query is evaluated against a point-in-time snapshot of the collection;
/// writes landing between the read and any subsequent batch write are not
/// reflected in the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    owner: Option<OwnerId>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    created_before: Option<DateTime<Utc>>,
    order_by_created_on: bool,
}

impl TaskQuery {
    /// Creates an unfiltered query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to one owner.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Restricts results to one lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to one priority band.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to tasks created strictly before the cutoff.
    #[must_use]
    pub const fn created_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_before = Some(cutoff);
        self
    }

    /// Orders results by ascending creation time, ties broken by task id.
    #[must_use]
    pub const fn order_by_created_on(mut self) -> Self {
        self.order_by_created_on = true;
        self
    }

    /// Returns the owner filter, if set.
    #[must_use]
    pub const fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    /// Returns the status filter, if set.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the priority filter, if set.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the creation-time cutoff, if set.
    #[must_use]
    pub const fn created_before_cutoff(&self) -> Option<DateTime<Utc>> {
        self.created_before
    }

    /// Returns whether ascending creation-time ordering was requested.
    #[must_use]
    pub const fn is_ordered_by_created_on(&self) -> bool {
        self.order_by_created_on
    }
}

/// Task persistence contract.
///
/// The store is the only shared resource between the reactive handlers and
/// the batch jobs; safety relies on its per-document write atomicity, not on
/// in-process coordination.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task, assigning its identifier, and returns the
    /// materialised record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] on transport or storage
    /// failure.
    async fn create(&self, new: NewTask) -> TaskStoreResult<Task>;

    /// Fetches a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;

    /// Applies a partial field overwrite to one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update_fields(&self, id: TaskId, patch: TaskPatch) -> TaskStoreResult<()>;

    /// Runs a filtered query and returns the matching snapshot.
    async fn query(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>>;

    /// Applies every patch or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::BatchAtomicity`] when atomicity cannot be
    /// guaranteed and [`TaskStoreError::NotFound`] when any referenced task
    /// is missing (in which case no patch is applied).
    async fn batch_write(&self, writes: Vec<(TaskId, TaskPatch)>) -> TaskStoreResult<()>;

    /// Per-batch size cap imposed by the adapter, if any.
    ///
    /// Callers submitting more writes than the cap must chunk them in
    /// selection order.
    fn max_batch_size(&self) -> Option<usize> {
        None
    }
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// Transient transport or storage failure; the operation was abandoned.
    #[error("task store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The referenced task vanished between read and write.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A batch write could not be applied atomically.
    #[error("batch write atomicity violated: {0}")]
    BatchAtomicity(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a transport or storage failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a failed batch commit.
    pub fn batch_atomicity(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::BatchAtomicity(Arc::new(err))
    }
}
