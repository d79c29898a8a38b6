//! Domain model for the WIP-limited task lifecycle.
//!
//! The domain models the task aggregate, its status and priority lifecycles,
//! and the validated configuration values the engine components receive at
//! construction, while keeping all infrastructure concerns outside of the
//! domain boundary.

mod config;
mod error;
mod ids;
mod task;

pub use config::{JobSchedule, RetentionPolicy, WipLimits};
pub use error::{ConfigError, ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{OwnerId, TaskId};
pub use task::{NewTask, PersistedTaskData, Priority, Task, TaskPatch, TaskStatus};
