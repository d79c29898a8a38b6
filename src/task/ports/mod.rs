//! Port contracts consumed by the engine services.

mod events;
mod store;

pub use events::{CreateEvent, TaskEventFeed, UpdateEvent};
pub use store::{TaskQuery, TaskStore, TaskStoreError, TaskStoreResult};
