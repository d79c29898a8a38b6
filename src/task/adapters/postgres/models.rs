//! Diesel row models for task persistence.

use super::schema::tasks;
use crate::task::domain::{
    OwnerId, PersistedTaskData, Priority, Task, TaskId, TaskPatch, TaskStatus,
};
use crate::task::ports::{TaskStoreError, TaskStoreResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Stable owner identifier.
    pub owner: String,
    /// Numeric priority rank.
    pub priority: i16,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Optional target date.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion timestamp, if set.
    pub completed_on: Option<DateTime<Utc>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Stable owner identifier.
    pub owner: String,
    /// Numeric priority rank.
    pub priority: i16,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Optional target date.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion timestamp, if set.
    pub completed_on: Option<DateTime<Utc>>,
}

/// Partial-update changeset mirroring [`TaskPatch`].
///
/// Outer `Option` skips unchanged columns; `Some(None)` on a nullable column
/// writes SQL `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// New status, if changing.
    pub status: Option<String>,
    /// New priority rank, if changing.
    pub priority: Option<i16>,
    /// New due date, if changing.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New completion timestamp, if changing.
    pub completed_on: Option<Option<DateTime<Utc>>>,
}

impl From<&TaskPatch> for TaskChangeset {
    fn from(patch: &TaskPatch) -> Self {
        Self {
            status: patch.status.map(|status| status.as_str().to_owned()),
            priority: patch.priority.map(Priority::rank),
            due_date: patch.due_date,
            completed_on: patch.completed_on,
        }
    }
}

/// Converts a persisted row into the domain aggregate.
///
/// # Errors
///
/// Returns [`TaskStoreError::Unavailable`] when a persisted value no longer
/// parses as a valid domain value.
pub fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        owner: persisted_owner,
        priority: persisted_priority,
        status: persisted_status,
        created_on,
        due_date,
        completed_on,
    } = row;

    let owner = OwnerId::new(persisted_owner).map_err(TaskStoreError::unavailable)?;
    let priority = Priority::from_rank(persisted_priority).map_err(TaskStoreError::unavailable)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskStoreError::unavailable)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner,
        priority,
        status,
        created_on,
        due_date,
        completed_on,
    }))
}

/// Builds an insert row for a materialised task.
pub fn task_to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        owner: task.owner().as_str().to_owned(),
        priority: task.priority().rank(),
        status: task.status().as_str().to_owned(),
        created_on: task.created_on(),
        due_date: task.due_date(),
        completed_on: task.completed_on(),
    }
}
