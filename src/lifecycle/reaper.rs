//! Reclamation of finished connection workers.
//!
//! # Responsibilities
//! - Collect every worker's join handle so finished tasks never leak
//! - Log each worker's outcome, including panics
//!
//! The supervisor holds submitted handles in a `FuturesUnordered` and
//! reaps each as it completes. It only ever touches termination
//! bookkeeping; a worker's socket and buffer stay private to the worker.
//! Reaping a finished worker never waits on an unfinished one, and the
//! accept loop never waits on the reaper.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// How a connection worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The fixed acknowledgement was written.
    Responded,
    /// A protocol upgrade was requested; the worker closed normally.
    UpgradeDetected,
    /// The cycle failed; the connection closed without a response.
    Failed,
}

/// Supervisor reclaiming terminated workers.
///
/// Cheap to clone; clones share the same supervisor task.
#[derive(Clone)]
pub struct Reaper {
    tx: mpsc::UnboundedSender<JoinHandle<WorkerOutcome>>,
    submitted: Arc<AtomicU64>,
    reaped: Arc<AtomicU64>,
}

impl Reaper {
    /// Spawn the supervisor task and return a handle for submissions.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<JoinHandle<WorkerOutcome>>();
        let submitted = Arc::new(AtomicU64::new(0));
        let reaped = Arc::new(AtomicU64::new(0));

        let reaped_in_task = Arc::clone(&reaped);
        tokio::spawn(async move {
            let mut active: FuturesUnordered<JoinHandle<WorkerOutcome>> = FuturesUnordered::new();
            loop {
                tokio::select! {
                    handle = rx.recv() => match handle {
                        Some(handle) => active.push(handle),
                        // All submitters gone: drain what is left and stop.
                        None => break,
                    },
                    Some(result) = active.next(), if !active.is_empty() => {
                        reap(result);
                        reaped_in_task.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
            while let Some(result) = active.next().await {
                reap(result);
                reaped_in_task.fetch_add(1, Ordering::SeqCst);
            }
            tracing::debug!("Reaper stopped");
        });

        Self {
            tx,
            submitted,
            reaped,
        }
    }

    /// Hand a worker's join handle to the supervisor.
    pub fn submit(&self, handle: JoinHandle<WorkerOutcome>) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        // Send only fails if the supervisor is gone, i.e. at process exit.
        let _ = self.tx.send(handle);
    }

    /// Total workers submitted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }

    /// Total workers reclaimed so far.
    pub fn reaped(&self) -> u64 {
        self.reaped.load(Ordering::SeqCst)
    }

    /// Workers submitted but not yet reclaimed.
    pub fn in_flight(&self) -> u64 {
        self.submitted() - self.reaped()
    }
}

fn reap(result: Result<WorkerOutcome, JoinError>) {
    match result {
        Ok(outcome) => tracing::debug!(?outcome, "Worker reaped"),
        Err(e) if e.is_panic() => tracing::error!(error = %e, "Worker panicked"),
        Err(e) => tracing::warn!(error = %e, "Worker cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_until_reaped(reaper: &Reaper, expected: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while reaper.reaped() < expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("reaper did not reach quiescence");
    }

    #[tokio::test]
    async fn reaps_all_completed_workers() {
        let reaper = Reaper::spawn();

        for i in 0..5u64 {
            reaper.submit(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(i * 5)).await;
                WorkerOutcome::Responded
            }));
        }

        wait_until_reaped(&reaper, 5).await;
        assert_eq!(reaper.submitted(), 5);
        assert_eq!(reaper.in_flight(), 0);
    }

    #[tokio::test]
    async fn a_panicking_worker_is_still_reaped() {
        let reaper = Reaper::spawn();

        reaper.submit(tokio::spawn(async { panic!("worker crash") }));
        reaper.submit(tokio::spawn(async { WorkerOutcome::Responded }));

        wait_until_reaped(&reaper, 2).await;
        assert_eq!(reaper.in_flight(), 0);
    }

    #[tokio::test]
    async fn slow_workers_do_not_block_reaping_finished_ones() {
        let reaper = Reaper::spawn();

        reaper.submit(tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            WorkerOutcome::Failed
        }));
        reaper.submit(tokio::spawn(async { WorkerOutcome::Responded }));

        wait_until_reaped(&reaper, 1).await;
        assert_eq!(reaper.in_flight(), 1);
    }
}
