//! Batch scheduling — fixed-size groups of fully concurrent workers
//!
//! Batching is the only backpressure mechanism in the pipeline: at most
//! `batch_size` workers run at once, and batch N+1 never starts before
//! every worker of batch N has terminated. The join is a hard barrier,
//! not a best-effort wait. There is no queue, no cancellation, and no
//! fairness guarantee beyond batch order.

use futures::future::join_all;
use std::future::Future;

/// Partition `locators` into contiguous groups of at most `batch_size` and
/// run each group's workers fully concurrently, joining the whole group
/// before advancing.
///
/// Every locator gets its own spawned task. A worker panic is contained at
/// the join and logged; siblings and later batches are unaffected.
pub(crate) async fn run_batches<F, Fut>(locators: Vec<String>, batch_size: usize, worker: F)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let batch_size = batch_size.max(1);

    for batch in locators.chunks(batch_size) {
        let tasks: Vec<_> = batch
            .iter()
            .map(|locator| tokio::spawn(worker(locator.clone())))
            .collect();
        for joined in join_all(tasks).await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Download worker panicked");
            }
        }
    }
}
