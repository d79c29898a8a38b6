//! Chunked all-or-nothing batch submission shared by the batch jobs.

use crate::task::{
    domain::{TaskId, TaskPatch},
    ports::{TaskStore, TaskStoreResult},
};

/// Submits writes through `batch_write`, splitting them into chunks no larger
/// than the adapter's per-batch cap.
///
/// Chunks are cut in the order the writes were selected, which preserves the
/// per-owner FIFO contract of the callers. Each chunk commits atomically; a
/// failure aborts before any later chunk is submitted, so earlier committed
/// chunks stand.
pub(crate) async fn commit_in_chunks<S>(
    store: &S,
    writes: Vec<(TaskId, TaskPatch)>,
) -> TaskStoreResult<()>
where
    S: TaskStore,
{
    if writes.is_empty() {
        return Ok(());
    }

    let chunk_size = store.max_batch_size().unwrap_or(writes.len()).max(1);
    for chunk in writes.chunks(chunk_size) {
        store.batch_write(chunk.to_vec()).await?;
    }
    Ok(())
}
