// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bounded worker pool
//!
//! A fixed number of workers drain a shared queue of items. A failing or
//! panicking item is reported as a failed outcome and does not affect the
//! other items. `dispatch` returns only after every worker has finished.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Result of processing one item
#[derive(Debug)]
pub struct WorkOutcome<R> {
    pub label: String,
    pub result: SyncResult<R>,
}

pub struct WorkerPool {
    max_workers: usize,
    cancel: CancellationToken,
}

impl WorkerPool {
    pub fn new(max_workers: usize, cancel: CancellationToken) -> Self {
        Self {
            max_workers: max_workers.max(1),
            cancel,
        }
    }

    /// Workers started for `items` queued items
    pub fn worker_count(&self, items: usize) -> usize {
        self.max_workers.min(items)
    }

    /// Process every item, returning outcomes in item order
    ///
    /// Once the pool's token is cancelled, workers stop claiming items and
    /// every unclaimed item is reported as cancelled.
    ///
    /// # Arguments
    /// * `items` - Work items, queued in order
    /// * `label` - Name of an item, used in logs and in its outcome
    /// * `work` - Processing of one item; runs in its own task
    ///
    /// # Returns
    /// * One `WorkOutcome` per item, in the order of `items`. An error or panic
    ///   of an item is its outcome and does not stop the other items.
    pub async fn dispatch<T, R, L, F, Fut>(
        &self,
        items: Vec<T>,
        label: L,
        work: F,
    ) -> Vec<WorkOutcome<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        L: Fn(&T) -> String + Send,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SyncResult<R>> + Send + 'static,
    {
        let total = items.len();
        let workers = self.worker_count(total);
        if workers == 0 {
            return Vec::new();
        }

        let queue: Arc<Mutex<VecDeque<(usize, String, T)>>> = Arc::new(Mutex::new(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index, label(&item), item))
                .collect(),
        ));
        let work = Arc::new(work);
        log::debug!("Starting {} workers for {} items", workers, total);

        let mut set = JoinSet::new();
        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let work = Arc::clone(&work);
            let cancel = self.cancel.clone();

            set.spawn(async move {
                let mut outcomes = Vec::new();
                loop {
                    if cancel.is_cancelled() {
                        log::debug!("Worker {} stopping on cancellation", worker_id);
                        break;
                    }
                    let next = queue.lock().pop_front();
                    let Some((index, label, item)) = next else {
                        break;
                    };
                    log::debug!("Worker {} processing {}", worker_id, label);

                    // Each item runs in its own task so a panic stays contained
                    let result = match tokio::spawn((*work)(item)).await {
                        Ok(result) => result,
                        Err(e) => Err(SyncError::Worker(format!("{} panicked: {}", label, e))),
                    };
                    if let Err(e) = &result {
                        log::error!("Processing {} failed: {}", label, e);
                    }
                    outcomes.push((index, WorkOutcome { label, result }));
                }
                outcomes
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(batch) => outcomes.extend(batch),
                Err(e) => log::error!("Worker terminated abnormally: {}", e),
            }
        }

        for (index, label, _) in queue.lock().drain(..) {
            let result = Err(SyncError::Cancelled(format!("{} was not started", label)));
            outcomes.push((index, WorkOutcome { label, result }));
        }

        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_failure_does_not_affect_other_items() {
        let pool = WorkerPool::new(2, CancellationToken::new());
        let outcomes = pool
            .dispatch(
                vec![1, 2, 3, 4],
                |n| format!("item {}", n),
                |n: i32| async move {
                    if n == 2 {
                        Err(SyncError::Source("unreachable".into()))
                    } else {
                        Ok(n * 10)
                    }
                },
            )
            .await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].result, Ok(10));
        assert!(outcomes[1].result.is_err());
        assert_eq!(outcomes[1].label, "item 2");
        assert_eq!(outcomes[3].result, Ok(40));
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let pool = WorkerPool::new(1, CancellationToken::new());
        let outcomes = pool
            .dispatch(
                vec![1, 2, 3],
                |n| n.to_string(),
                |n: i32| async move {
                    if n == 1 {
                        panic!("worker blew up");
                    }
                    Ok(n)
                },
            )
            .await;

        assert!(matches!(outcomes[0].result, Err(SyncError::Worker(_))));
        assert_eq!(outcomes[1].result, Ok(2));
        assert_eq!(outcomes[2].result, Ok(3));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(3, CancellationToken::new());
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (r, p) = (running.clone(), peak.clone());
        let outcomes = pool
            .dispatch(
                (0..12).collect::<Vec<_>>(),
                |n| n.to_string(),
                move |n: i32| {
                    let running = r.clone();
                    let peak = p.clone();
                    async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        Ok(n)
                    }
                },
            )
            .await;

        assert_eq!(outcomes.len(), 12);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(pool.worker_count(12), 3);
        assert_eq!(pool.worker_count(2), 2);
    }

    #[tokio::test]
    async fn test_cancellation_reports_unstarted_items() {
        let token = CancellationToken::new();
        let pool = WorkerPool::new(1, token.clone());

        let outcomes = pool
            .dispatch(
                vec![1, 2, 3],
                |n| n.to_string(),
                move |n: i32| {
                    let token = token.clone();
                    async move {
                        token.cancel();
                        Ok(n)
                    }
                },
            )
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result, Ok(1));
        assert!(matches!(outcomes[1].result, Err(SyncError::Cancelled(_))));
        assert!(matches!(outcomes[2].result, Err(SyncError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pool = WorkerPool::new(4, CancellationToken::new());
        let outcomes = pool
            .dispatch(Vec::<i32>::new(), |n| n.to_string(), |n: i32| async move {
                Ok(n)
            })
            .await;
        assert!(outcomes.is_empty());
    }
}
