//! In-memory task store for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::task::{
    domain::{NewTask, Task, TaskId, TaskPatch},
    ports::{
        CreateEvent, TaskEventFeed, TaskQuery, TaskStore, TaskStoreError, TaskStoreResult,
        UpdateEvent,
    },
};

/// Thread-safe in-memory task store.
///
/// Implements the full collaborator contract, including the change feed used
/// by the reactive handlers. Queries evaluate against a snapshot under a read
/// lock; batch writes validate every target before mutating anything, so a
/// batch either fully applies or leaves the collection untouched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    tasks: HashMap<TaskId, Task>,
    create_watchers: Vec<UnboundedSender<CreateEvent>>,
    update_watchers: Vec<UnboundedSender<UpdateEvent>>,
}

impl InMemoryState {
    fn emit_create(&mut self, task: &Task) {
        let event = CreateEvent { task: task.clone() };
        self.create_watchers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    fn emit_update(&mut self, before: Task, after: Task) {
        let event = UpdateEvent { before, after };
        self.update_watchers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(
        &self,
    ) -> TaskStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryState>> {
        self.state
            .write()
            .map_err(|err| TaskStoreError::unavailable(std::io::Error::other(err.to_string())))
    }

    fn read_state(&self) -> TaskStoreResult<std::sync::RwLockReadGuard<'_, InMemoryState>> {
        self.state
            .read()
            .map_err(|err| TaskStoreError::unavailable(std::io::Error::other(err.to_string())))
    }
}

fn matches(query: &TaskQuery, task: &Task) -> bool {
    if let Some(owner) = query.owner()
        && task.owner() != owner
    {
        return false;
    }
    if let Some(status) = query.status()
        && task.status() != status
    {
        return false;
    }
    if let Some(priority) = query.priority()
        && task.priority() != priority
    {
        return false;
    }
    if let Some(cutoff) = query.created_before_cutoff()
        && task.created_on() >= cutoff
    {
        return false;
    }
    true
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, new: NewTask) -> TaskStoreResult<Task> {
        let task = Task::from_new(TaskId::new(), new);
        let mut state = self.write_state()?;
        state.tasks.insert(task.id(), task.clone());
        state.emit_create(&task);
        Ok(task)
    }

    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStoreError::NotFound(id))
    }

    async fn update_fields(&self, id: TaskId, patch: TaskPatch) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let before = state
            .tasks
            .get(&id)
            .ok_or(TaskStoreError::NotFound(id))?
            .clone();

        let mut after = before.clone();
        after.apply(&patch);
        state.tasks.insert(id, after.clone());
        state.emit_update(before, after);
        Ok(())
    }

    async fn query(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut result: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches(query, task))
            .cloned()
            .collect();

        if query.is_ordered_by_created_on() {
            result.sort_by_key(|task| (task.created_on(), task.id()));
        }
        Ok(result)
    }

    async fn batch_write(&self, writes: Vec<(TaskId, TaskPatch)>) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;

        // Validate every target before touching any, so a miss leaves the
        // collection unchanged.
        for (id, _) in &writes {
            if !state.tasks.contains_key(id) {
                return Err(TaskStoreError::NotFound(*id));
            }
        }

        let mut transitions = Vec::with_capacity(writes.len());
        for (id, patch) in writes {
            let Some(before) = state.tasks.get(&id).cloned() else {
                continue;
            };
            let mut after = before.clone();
            after.apply(&patch);
            state.tasks.insert(id, after.clone());
            transitions.push((before, after));
        }
        for (before, after) in transitions {
            state.emit_update(before, after);
        }
        Ok(())
    }
}

impl TaskEventFeed for InMemoryTaskStore {
    fn watch_creates(&self) -> UnboundedReceiver<CreateEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        if let Ok(mut state) = self.state.write() {
            state.create_watchers.push(sender);
        }
        receiver
    }

    fn watch_updates(&self) -> UnboundedReceiver<UpdateEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        if let Ok(mut state) = self.state.write() {
            state.update_watchers.push(sender);
        }
        receiver
    }
}
