//! Chunked batch submission tests: cap-driven splitting, selection-order
//! preservation, and the partial-commit semantics of a mid-run failure.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use super::support::{reference_instant, seed_task};
use crate::task::adapters::memory::InMemoryTaskStore;
use crate::task::domain::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};
use crate::task::ports::{TaskQuery, TaskStore, TaskStoreError, TaskStoreResult};
use crate::task::services::commit_in_chunks;
use async_trait::async_trait;
use eyre::ensure;
use rstest::rstest;
use std::sync::Mutex;

/// Store decorator with a small per-batch cap that records every submitted
/// batch and can fail a chosen one.
struct CappedStore {
    inner: InMemoryTaskStore,
    cap: usize,
    batches: Mutex<Vec<Vec<TaskId>>>,
    fail_on_batch: Option<usize>,
}

impl CappedStore {
    fn new(inner: InMemoryTaskStore, cap: usize) -> Self {
        Self {
            inner,
            cap,
            batches: Mutex::new(Vec::new()),
            fail_on_batch: None,
        }
    }

    fn failing_on(inner: InMemoryTaskStore, cap: usize, batch_index: usize) -> Self {
        Self {
            fail_on_batch: Some(batch_index),
            ..Self::new(inner, cap)
        }
    }

    fn submitted_batches(&self) -> Vec<Vec<TaskId>> {
        self.batches.lock().expect("batch log lock").clone()
    }
}

#[async_trait]
impl TaskStore for CappedStore {
    async fn create(&self, new: NewTask) -> TaskStoreResult<Task> {
        self.inner.create(new).await
    }

    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.inner.get(id).await
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        self.inner.delete(id).await
    }

    async fn update_fields(&self, id: TaskId, patch: TaskPatch) -> TaskStoreResult<()> {
        self.inner.update_fields(id, patch).await
    }

    async fn query(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>> {
        self.inner.query(query).await
    }

    async fn batch_write(&self, writes: Vec<(TaskId, TaskPatch)>) -> TaskStoreResult<()> {
        let index = {
            let mut batches = self.batches.lock().expect("batch log lock");
            batches.push(writes.iter().map(|(id, _)| *id).collect());
            batches.len() - 1
        };
        if self.fail_on_batch == Some(index) {
            return Err(TaskStoreError::unavailable(std::io::Error::other(
                "batch rejected",
            )));
        }
        self.inner.batch_write(writes).await
    }

    fn max_batch_size(&self) -> Option<usize> {
        Some(self.cap)
    }
}

async fn seed_queued(inner: &InMemoryTaskStore, count: usize) -> Vec<Task> {
    let now = reference_instant();
    let mut tasks = Vec::with_capacity(count);
    for _ in 0..count {
        tasks.push(seed_task(inner, "u1", Priority::P1, TaskStatus::Queued, now).await);
    }
    tasks
}

fn activate_all(tasks: &[Task]) -> Vec<(TaskId, TaskPatch)> {
    tasks
        .iter()
        .map(|task| (task.id(), TaskPatch::status(TaskStatus::Active)))
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chunks_respect_the_cap_and_preserve_selection_order() -> eyre::Result<()> {
    let inner = InMemoryTaskStore::new();
    let tasks = seed_queued(&inner, 5).await;
    let store = CappedStore::new(inner, 2);

    commit_in_chunks(&store, activate_all(&tasks)).await?;

    let expected: Vec<Vec<TaskId>> = vec![
        tasks.iter().take(2).map(Task::id).collect(),
        tasks.iter().skip(2).take(2).map(Task::id).collect(),
        tasks.iter().skip(4).map(Task::id).collect(),
    ];
    ensure!(store.submitted_batches() == expected);

    for task in &tasks {
        let stored = store
            .get(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task missing after commit"))?;
        ensure!(stored.status() == TaskStatus::Active);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_chunk_leaves_earlier_chunks_committed(
    #[values(2, 1)] cap: usize,
) -> eyre::Result<()> {
    let inner = InMemoryTaskStore::new();
    let tasks = seed_queued(&inner, cap * 2 + 1).await;
    let store = CappedStore::failing_on(inner, cap, 1);

    let result = commit_in_chunks(&store, activate_all(&tasks)).await;
    ensure!(matches!(result, Err(TaskStoreError::Unavailable(_))));

    // The second chunk was rejected, so nothing after the first is submitted.
    ensure!(store.submitted_batches().len() == 2);

    for (position, task) in tasks.iter().enumerate() {
        let stored = store
            .get(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task missing after failed commit"))?;
        let expected = if position < cap {
            TaskStatus::Active
        } else {
            TaskStatus::Queued
        };
        ensure!(stored.status() == expected, "write {position} wrong state");
    }
    Ok(())
}
