//! `PostgreSQL` store implementation for task persistence.

use super::{
    models::{TaskChangeset, TaskRow, row_to_task, task_to_new_row},
    schema::tasks,
};
use crate::task::{
    domain::{NewTask, Task, TaskId, TaskPatch},
    ports::{TaskQuery, TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by the task store adapter.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Ceiling on writes per batch transaction. Matches the 500-write limit
/// common to document stores, so batch jobs chunk identically against any
/// backend.
const MAX_BATCH_WRITES: usize = 500;

/// `PostgreSQL`-backed task store.
///
/// Does not implement the event feed port: a relational store has no native
/// document-watch surface, so reactive handlers are fed from elsewhere.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

#[derive(Debug, Error)]
enum BatchTxError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    #[error("task not found in batch: {0}")]
    Missing(TaskId),
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::unavailable)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn create(&self, new: NewTask) -> TaskStoreResult<Task> {
        let task = Task::from_new(TaskId::new(), new);
        let new_row = task_to_new_row(&task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(TaskStoreError::unavailable)?;
            Ok(())
        })
        .await?;
        Ok(task)
    }

    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::unavailable)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskStoreError::unavailable)?;
            if deleted == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn update_fields(&self, id: TaskId, patch: TaskPatch) -> TaskStoreResult<()> {
        if patch.is_empty() {
            return self
                .get(id)
                .await?
                .map(|_| ())
                .ok_or(TaskStoreError::NotFound(id));
        }

        let changeset = TaskChangeset::from(&patch);
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskStoreError::unavailable)?;
            if updated == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn query(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>> {
        let query = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = tasks::table.into_boxed();
            if let Some(owner) = query.owner() {
                statement = statement.filter(tasks::owner.eq(owner.as_str().to_owned()));
            }
            if let Some(status) = query.status() {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = query.priority() {
                statement = statement.filter(tasks::priority.eq(priority.rank()));
            }
            if let Some(cutoff) = query.created_before_cutoff() {
                statement = statement.filter(tasks::created_on.lt(cutoff));
            }
            if query.is_ordered_by_created_on() {
                statement = statement.order((tasks::created_on.asc(), tasks::id.asc()));
            }

            let rows = statement
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::unavailable)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn batch_write(&self, writes: Vec<(TaskId, TaskPatch)>) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<_, BatchTxError, _>(|connection| {
                for (id, patch) in &writes {
                    if patch.is_empty() {
                        continue;
                    }
                    let changeset = TaskChangeset::from(patch);
                    let updated =
                        diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                            .set(&changeset)
                            .execute(connection)?;
                    if updated == 0 {
                        return Err(BatchTxError::Missing(*id));
                    }
                }
                Ok(())
            });

            outcome.map_err(|err| match err {
                BatchTxError::Missing(id) => TaskStoreError::NotFound(id),
                BatchTxError::Diesel(err) => TaskStoreError::batch_atomicity(err),
            })
        })
        .await
    }

    fn max_batch_size(&self) -> Option<usize> {
        Some(MAX_BATCH_WRITES)
    }
}
