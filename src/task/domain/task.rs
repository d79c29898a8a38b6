//! Task aggregate root and related lifecycle types.

use super::{OwnerId, ParsePriorityError, ParseTaskStatusError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is waiting for a triage pass or manual activation.
    Queued,
    /// Task counts toward its owner's work-in-progress.
    Active,
    /// Task has been completed.
    Done,
    /// Task aged out of the queue and was retired.
    Archived,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Active => "active",
            Self::Done => "done",
            Self::Archived => "archived",
        }
    }

    /// Returns `true` for statuses the engine never transitions out of.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Archived)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "queued" => Ok(Self::Queued),
            "active" => Ok(Self::Active),
            "done" => Ok(Self::Done),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Urgency band of a task; `P1` is the most urgent.
///
/// Ordering follows urgency: `P1 < P2 < P3 < P4`, so sorting ascending puts
/// the most urgent work first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Highest urgency; activation is WIP-capped.
    P1,
    /// High urgency; activation is WIP-capped.
    P2,
    /// Normal urgency; never auto-promoted, never capped.
    P3,
    /// Low urgency; never auto-promoted, never capped.
    P4,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
            Self::P3 => "p3",
            Self::P4 => "p4",
        }
    }

    /// Returns `true` when activations of this priority count toward a
    /// per-owner WIP cap.
    #[must_use]
    pub const fn is_capped(self) -> bool {
        matches!(self, Self::P1 | Self::P2)
    }

    /// Returns the numeric rank persisted by relational adapters (1–4).
    #[must_use]
    pub const fn rank(self) -> i16 {
        match self {
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
            Self::P4 => 4,
        }
    }

    /// Reconstructs a priority from its persisted numeric rank.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePriorityError`] for ranks outside 1–4.
    pub fn from_rank(rank: i16) -> Result<Self, ParsePriorityError> {
        match rank {
            1 => Ok(Self::P1),
            2 => Ok(Self::P2),
            3 => Ok(Self::P3),
            4 => Ok(Self::P4),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "p1" => Ok(Self::P1),
            "p2" => Ok(Self::P2),
            "p3" => Ok(Self::P3),
            "p4" => Ok(Self::P4),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    priority: Priority,
    status: TaskStatus,
    created_on: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    completed_on: Option<DateTime<Utc>>,
}

/// Creation payload for a task; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    owner: OwnerId,
    priority: Priority,
    status: TaskStatus,
    created_on: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates a queued task payload stamped with the current clock time.
    #[must_use]
    pub fn new(owner: OwnerId, priority: Priority, clock: &impl Clock) -> Self {
        Self {
            owner,
            priority,
            status: TaskStatus::Queued,
            created_on: clock.utc(),
            due_date: None,
        }
    }

    /// Sets the initial status (the client layer may create directly into
    /// `Active`; admission control corrects over-cap creations after the
    /// fact).
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Overrides the creation timestamp.
    #[must_use]
    pub const fn with_created_on(mut self, created_on: DateTime<Utc>) -> Self {
        self.created_on = created_on;
        self
    }

    /// Sets the optional due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the owner of the task being created.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the priority of the task being created.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner: OwnerId,
    /// Persisted priority band.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_on: Option<DateTime<Utc>>,
}

impl Task {
    /// Materialises a task from a creation payload and a store-assigned id.
    #[must_use]
    pub fn from_new(id: TaskId, new: NewTask) -> Self {
        Self {
            id,
            owner: new.owner,
            priority: new.priority,
            status: new.status,
            created_on: new.created_on,
            due_date: new.due_date,
            completed_on: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            priority: data.priority,
            status: data.status,
            created_on: data.created_on,
            due_date: data.due_date,
            completed_on: data.completed_on,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user's identifier.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the priority band.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp (the fairness key for promotion).
    #[must_use]
    pub const fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_on(&self) -> Option<DateTime<Utc>> {
        self.completed_on
    }

    /// Applies a partial update to the mutable fields.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed_on) = patch.completed_on {
            self.completed_on = completed_on;
        }
    }
}

/// Partial field overwrite for a task.
///
/// Outer `Option` distinguishes "leave unchanged" from "write this value";
/// the inner `Option` on clearable fields distinguishes "write null".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New status, if the status changes.
    pub status: Option<TaskStatus>,
    /// New priority, if the priority changes.
    pub priority: Option<Priority>,
    /// New due date (`Some(None)` clears it).
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New completion timestamp (`Some(None)` clears it).
    pub completed_on: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only moves the task to the given status.
    #[must_use]
    pub const fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            priority: None,
            due_date: None,
            completed_on: None,
        }
    }

    /// Patch that stamps the completion timestamp.
    #[must_use]
    pub const fn completed_on(completed_on: DateTime<Utc>) -> Self {
        Self {
            status: None,
            priority: None,
            due_date: None,
            completed_on: Some(Some(completed_on)),
        }
    }

    /// Patch restoring every mutable field of a prior snapshot verbatim.
    ///
    /// Used by admission control to revert a disallowed transition without
    /// field drift.
    #[must_use]
    pub const fn revert_to(snapshot: &Task) -> Self {
        Self {
            status: Some(snapshot.status),
            priority: Some(snapshot.priority),
            due_date: Some(snapshot.due_date),
            completed_on: Some(snapshot.completed_on),
        }
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed_on.is_none()
    }
}
