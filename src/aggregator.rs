use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::ops::{OpsCollector, QueryOutcome};
use crate::sample::{MetricSample, QueryParameters, ResultSet};
use crate::store::StorePool;

/// Fans a query out to every store, waits for each to answer or spend its
/// own timeout budget, and returns the deduplicated union.
pub struct ReadAggregator {
    pool: Arc<StorePool>,
    read_timeout: Duration,
    ops: Arc<OpsCollector>,
}

impl ReadAggregator {
    pub fn new(
        pool: Arc<StorePool>,
        read_timeout: Duration,
        ops: Arc<OpsCollector>,
    ) -> Self {
        Self {
            pool,
            read_timeout,
            ops,
        }
    }

    /// Never fails: a store outage shrinks coverage, it does not error the
    /// call. Every store gets its own `read_timeout` budget; stores that
    /// blow it (or error) contribute nothing and the rest still count.
    pub async fn query(&self, query: QueryParameters) -> ResultSet {
        let stores = self.pool.handles();
        let mut set = ResultSet::default();
        if stores.is_empty() {
            self.ops.record_read(0);
            return set;
        }

        let (tx, rx) = mpsc::channel::<Vec<MetricSample>>(stores.len());
        for store in stores {
            let store = Arc::clone(store);
            let query = query.clone();
            let tx = tx.clone();
            let ops = Arc::clone(&self.ops);
            let budget = self.read_timeout;
            tokio::spawn(async move {
                let started = Instant::now();
                let rows =
                    match time::timeout(budget, store.query(&query)).await {
                        Ok(Ok(rows)) => {
                            ops.record_query(
                                store.label(),
                                started.elapsed(),
                                QueryOutcome::Served,
                            );
                            rows
                        }
                        Ok(Err(e)) => {
                            warn!(
                                store = store.label(),
                                error = %e,
                                "store query failed"
                            );
                            ops.record_query(
                                store.label(),
                                started.elapsed(),
                                QueryOutcome::Failed,
                            );
                            Vec::new()
                        }
                        Err(_) => {
                            warn!(
                                store = store.label(),
                                "store query timed out"
                            );
                            ops.record_query(
                                store.label(),
                                started.elapsed(),
                                QueryOutcome::TimedOut,
                            );
                            Vec::new()
                        }
                    };
                let _ = tx.send(rows).await;
            });
        }
        drop(tx);

        // Counting barrier: every store reports exactly once, sending
        // empty rows on error or timeout, and the merge only completes
        // once all of them have.
        let mut results = ReceiverStream::new(rx);
        let mut reported = 0;
        while reported < stores.len() {
            match results.next().await {
                Some(rows) => {
                    reported += 1;
                    set.merge(rows);
                }
                None => break,
            }
        }

        self.ops.record_read(set.len());
        set
    }
}

// ─── Tests ───────────────────────────────────────────────────────
