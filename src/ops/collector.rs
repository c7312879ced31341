use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::Serialize;

use super::percentiles::LatencySummary;

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range: 1 μs → 60 s, 3 significant figures
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 60_000_000;
const HIST_SIGFIG: u8 = 3;

// ─── Public types ────────────────────────────────────────────────

/// Outcome of one per-store query attempt, as the aggregator saw it.
#[derive(Debug, Clone, Copy)]
pub enum QueryOutcome {
    Served,
    Failed,
    TimedOut,
}

/// Thread-safe ops engine. The coordinator and aggregator push per-store
/// observations in; the `/status` endpoint pulls snapshots out.
pub struct OpsCollector {
    inner: Mutex<Inner>,
}

/// Per-store slice of the `/status` snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StoreOps {
    pub store: String,
    pub inserts_ok: u64,
    pub inserts_failed: u64,
    pub queries_served: u64,
    pub queries_failed: u64,
    pub queries_timed_out: u64,
    pub insert_latency: LatencySummary,
    pub query_latency: LatencySummary,
}

/// Complete snapshot returned by `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct OpsSnapshot {
    pub uptime_secs: f64,
    /// Writes that got at least one acknowledgment in time.
    pub submits_ok: u64,
    /// Writes where no store answered within the bound.
    pub submits_timed_out: u64,
    pub reads_served: u64,
    pub samples_returned: u64,
    pub stores: Vec<StoreOps>,
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    per_store: BTreeMap<String, StoreStats>,
    submits_ok: u64,
    submits_timed_out: u64,
    reads_served: u64,
    samples_returned: u64,
    started_at: Instant,
}

struct StoreStats {
    inserts_ok: u64,
    inserts_failed: u64,
    queries_served: u64,
    queries_failed: u64,
    queries_timed_out: u64,
    insert_hist: Histogram<u64>,
    query_hist: Histogram<u64>,
}

impl StoreStats {
    fn new() -> Self {
        Self {
            inserts_ok: 0,
            inserts_failed: 0,
            queries_served: 0,
            queries_failed: 0,
            queries_timed_out: 0,
            insert_hist: Histogram::<u64>::new_with_bounds(
                HIST_LOW, HIST_HIGH, HIST_SIGFIG,
            )
            .expect("histogram creation"),
            query_hist: Histogram::<u64>::new_with_bounds(
                HIST_LOW, HIST_HIGH, HIST_SIGFIG,
            )
            .expect("histogram creation"),
        }
    }
}

// ─── OpsCollector impl ───────────────────────────────────────────

impl OpsCollector {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                per_store: BTreeMap::new(),
                submits_ok: 0,
                submits_timed_out: 0,
                reads_served: 0,
                samples_returned: 0,
                started_at: Instant::now(),
            }),
        }
    }

    /// One store insert attempt finished.
    pub fn record_insert(&self, store: &str, elapsed: Duration, ok: bool) {
        let mut inner = self.inner.lock();
        let stats = inner.store_entry(store);
        if ok {
            stats.inserts_ok += 1;
        } else {
            stats.inserts_failed += 1;
        }
        // Clamp to ≥ 1 μs so sub-microsecond results still register.
        let _ = stats
            .insert_hist
            .record((elapsed.as_micros() as u64).max(1));
    }

    /// One store query attempt finished (or was abandoned to its timeout).
    pub fn record_query(
        &self,
        store: &str,
        elapsed: Duration,
        outcome: QueryOutcome,
    ) {
        let mut inner = self.inner.lock();
        let stats = inner.store_entry(store);
        match outcome {
            QueryOutcome::Served => stats.queries_served += 1,
            QueryOutcome::Failed => stats.queries_failed += 1,
            QueryOutcome::TimedOut => stats.queries_timed_out += 1,
        }
        let _ = stats
            .query_hist
            .record((elapsed.as_micros() as u64).max(1));
    }

    /// One SubmitMetric operation finished.
    pub fn record_submit(&self, ok: bool) {
        let mut inner = self.inner.lock();
        if ok {
            inner.submits_ok += 1;
        } else {
            inner.submits_timed_out += 1;
        }
    }

    /// One QueryMetrics operation finished.
    pub fn record_read(&self, samples_returned: usize) {
        let mut inner = self.inner.lock();
        inner.reads_served += 1;
        inner.samples_returned += samples_returned as u64;
    }

    pub fn snapshot(&self) -> OpsSnapshot {
        let inner = self.inner.lock();
        OpsSnapshot {
            uptime_secs: inner.started_at.elapsed().as_secs_f64(),
            submits_ok: inner.submits_ok,
            submits_timed_out: inner.submits_timed_out,
            reads_served: inner.reads_served,
            samples_returned: inner.samples_returned,
            stores: inner
                .per_store
                .iter()
                .map(|(store, stats)| StoreOps {
                    store: store.clone(),
                    inserts_ok: stats.inserts_ok,
                    inserts_failed: stats.inserts_failed,
                    queries_served: stats.queries_served,
                    queries_failed: stats.queries_failed,
                    queries_timed_out: stats.queries_timed_out,
                    insert_latency: LatencySummary::from_histogram(
                        &stats.insert_hist,
                    ),
                    query_latency: LatencySummary::from_histogram(
                        &stats.query_hist,
                    ),
                })
                .collect(),
        }
    }
}

impl Inner {
    fn store_entry(&mut self, store: &str) -> &mut StoreStats {
        self.per_store
            .entry(store.to_owned())
            .or_insert_with(StoreStats::new)
    }
}

// ─── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_is_all_zero() {
        let snap = OpsCollector::new().snapshot();
        assert_eq!(snap.submits_ok, 0);
        assert_eq!(snap.submits_timed_out, 0);
        assert_eq!(snap.reads_served, 0);
        assert!(snap.stores.is_empty());
    }

    #[test]
    fn per_store_counters_accumulate() {
        let ops = OpsCollector::new();
        ops.record_insert("a", Duration::from_micros(120), true);
        ops.record_insert("a", Duration::from_micros(80), true);
        ops.record_insert("a", Duration::from_micros(400), false);
        ops.record_query("b", Duration::from_millis(2), QueryOutcome::Served);
        ops.record_query("b", Duration::from_secs(10), QueryOutcome::TimedOut);

        let snap = ops.snapshot();
        assert_eq!(snap.stores.len(), 2);

        let a = &snap.stores[0];
        assert_eq!(a.store, "a");
        assert_eq!(a.inserts_ok, 2);
        assert_eq!(a.inserts_failed, 1);
        assert_eq!(a.insert_latency.count, 3);
        assert!(a.insert_latency.max_us >= a.insert_latency.min_us);

        let b = &snap.stores[1];
        assert_eq!(b.queries_served, 1);
        assert_eq!(b.queries_timed_out, 1);
        assert_eq!(b.queries_failed, 0);
    }

    #[test]
    fn operation_counters_accumulate() {
        let ops = OpsCollector::new();
        ops.record_submit(true);
        ops.record_submit(false);
        ops.record_read(3);
        ops.record_read(0);

        let snap = ops.snapshot();
        assert_eq!(snap.submits_ok, 1);
        assert_eq!(snap.submits_timed_out, 1);
        assert_eq!(snap.reads_served, 2);
        assert_eq!(snap.samples_returned, 3);
    }
}
