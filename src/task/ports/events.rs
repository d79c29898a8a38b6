//! Event feed port for the reactive handlers.
//!
//! Delivery is at-least-once with no ordering guarantee across documents and
//! best-effort ordering per document. Handlers must tolerate duplicates.

use crate::task::domain::Task;
use tokio::sync::mpsc::UnboundedReceiver;

/// Notification that a task document was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEvent {
    /// The task as written.
    pub task: Task,
}

/// Notification that a task document was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Snapshot before the write.
    pub before: Task,
    /// Snapshot after the write.
    pub after: Task,
}

/// Subscription surface for task document change notifications.
pub trait TaskEventFeed: Send + Sync {
    /// Opens a stream of creation events for the collection.
    fn watch_creates(&self) -> UnboundedReceiver<CreateEvent>;

    /// Opens a stream of update events for the collection.
    fn watch_updates(&self) -> UnboundedReceiver<UpdateEvent>;
}
