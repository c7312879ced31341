use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time;
use tracing::warn;

use crate::error::{Error, Result};
use crate::id;
use crate::ops::OpsCollector;
use crate::sample::SampleDraft;
use crate::store::StorePool;

/// Fans a single sample out to every store in the pool and answers as soon
/// as any one of them acknowledges it.
pub struct WriteCoordinator {
    pool: Arc<StorePool>,
    write_timeout: Duration,
    ops: Arc<OpsCollector>,
}

impl WriteCoordinator {
    pub fn new(
        pool: Arc<StorePool>,
        write_timeout: Duration,
        ops: Arc<OpsCollector>,
    ) -> Self {
        Self {
            pool,
            write_timeout,
            ops,
        }
    }

    /// Writes `draft` to at least one store, yielding the assigned id.
    ///
    /// The identity is assigned exactly once, before the first store
    /// attempt, so every store receives the same id for this logical
    /// sample. A per-store failure is logged and dropped, never surfaced.
    /// The first acknowledgment wins the race against `write_timeout`;
    /// the losing attempts are left running and their outcome discarded.
    /// A store that succeeds after the timeout leaves an orphaned row,
    /// the accepted cost of answering within the bound.
    pub async fn submit(&self, draft: SampleDraft) -> Result<String> {
        let id = id::next();
        let sample = draft.into_sample(id.clone());

        let (tx, mut rx) = mpsc::channel::<()>(self.pool.len().max(1));
        for store in self.pool.handles() {
            let store = Arc::clone(store);
            let sample = sample.clone();
            let tx = tx.clone();
            let ops = Arc::clone(&self.ops);
            tokio::spawn(async move {
                let started = Instant::now();
                match store.insert(&sample).await {
                    Ok(()) => {
                        ops.record_insert(
                            store.label(),
                            started.elapsed(),
                            true,
                        );
                        let _ = tx.send(()).await;
                    }
                    Err(e) => {
                        warn!(
                            store = store.label(),
                            error = %e,
                            "store insert failed"
                        );
                        ops.record_insert(
                            store.label(),
                            started.elapsed(),
                            false,
                        );
                    }
                }
            });
        }
        // Only the worker tasks hold senders now. If every store fails
        // before the deadline the channel closes and recv returns early.
        drop(tx);

        match time::timeout(self.write_timeout, rx.recv()).await {
            Ok(Some(())) => {
                self.ops.record_submit(true);
                Ok(id)
            }
            // Channel closed (all stores failed) or the clock won the race.
            _ => {
                self.ops.record_submit(false);
                Err(Error::WriteTimeout(self.write_timeout))
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────
