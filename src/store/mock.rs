//! In-process stores with scriptable latency and failure modes, used by
//! the coordinator/aggregator tests to exercise the timeout races without
//! a real Redis behind them.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::sleep;

use crate::error::{Error, Result};
use crate::sample::{MetricSample, QueryParameters};
use crate::store::MetricStore;

/// How a mock store responds to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Respond after the configured delay.
    Answer,
    /// Error after the configured delay.
    Fail,
    /// Never respond; callers only escape through their own timeout.
    Hang,
}

pub struct MockStore {
    label: String,
    behavior: Behavior,
    delay: Duration,
    query_delay: Option<Duration>,
    rows: Vec<MetricSample>,
    /// Everything this store accepted, in arrival order.
    pub inserted: Mutex<Vec<MetricSample>>,
}

impl MockStore {
    pub fn answering(label: &str) -> Self {
        Self::new(label, Behavior::Answer)
    }

    pub fn failing(label: &str) -> Self {
        Self::new(label, Behavior::Fail)
    }

    pub fn hanging(label: &str) -> Self {
        Self::new(label, Behavior::Hang)
    }

    fn new(label: &str, behavior: Behavior) -> Self {
        Self {
            label: label.to_owned(),
            behavior,
            delay: Duration::ZERO,
            query_delay: None,
            rows: Vec::new(),
            inserted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Lets queries answer on a different clock than inserts.
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    /// Pre-seeds rows that `query` will return in addition to anything
    /// inserted through this store.
    pub fn with_rows(mut self, rows: Vec<MetricSample>) -> Self {
        self.rows = rows;
        self
    }

    fn refused() -> Error {
        Error::Store(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "mock store refused",
        )))
    }
}

#[async_trait]
impl MetricStore for MockStore {
    fn label(&self) -> &str {
        &self.label
    }

    async fn insert(&self, sample: &MetricSample) -> Result<()> {
        match self.behavior {
            Behavior::Hang => std::future::pending().await,
            Behavior::Fail => {
                sleep(self.delay).await;
                Err(Self::refused())
            }
            Behavior::Answer => {
                sleep(self.delay).await;
                self.inserted.lock().push(sample.clone());
                Ok(())
            }
        }
    }

    async fn query(&self, query: &QueryParameters) -> Result<Vec<MetricSample>> {
        let delay = self.query_delay.unwrap_or(self.delay);
        match self.behavior {
            Behavior::Hang => std::future::pending().await,
            Behavior::Fail => {
                sleep(delay).await;
                Err(Self::refused())
            }
            Behavior::Answer => {
                sleep(delay).await;
                let inserted = self.inserted.lock();
                Ok(self
                    .rows
                    .iter()
                    .chain(inserted.iter())
                    .filter(|s| s.name == query.name && query.matches(s))
                    .cloned()
                    .collect())
            }
        }
    }
}
