pub mod redis;

#[cfg(test)]
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::sample::{MetricSample, QueryParameters};

/// One independent backing store holding a full, possibly stale copy of
/// the data. Implementations must tolerate concurrent use from many tasks;
/// the pool hands the same handle to every in-flight operation.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Stable identity used in logs and ops counters.
    fn label(&self) -> &str;

    /// Persist one sample. Called with the same sample (same id) on every
    /// store in the pool.
    async fn insert(&self, sample: &MetricSample) -> Result<()>;

    /// Return every stored sample matching the query.
    async fn query(&self, query: &QueryParameters) -> Result<Vec<MetricSample>>;
}

/// The set of store handles, built once at startup and never mutated.
///
/// There is no removal or health-check API on purpose: a store that goes
/// away mid-flight is absorbed per-operation by the coordinator/aggregator
/// timeout logic, not by shrinking the pool.
pub struct StorePool {
    stores: Vec<Arc<dyn MetricStore>>,
}

impl StorePool {
    /// Connects to every endpoint in order. Any malformed or unreachable
    /// endpoint makes the whole pool (and therefore the process) fail to
    /// start.
    pub async fn connect(urls: &[String]) -> Result<Self> {
        let mut stores: Vec<Arc<dyn MetricStore>> =
            Vec::with_capacity(urls.len());
        for url in urls {
            let store = redis::RedisStore::connect(url).await.map_err(|e| {
                Error::Config(format!("store {url} unavailable: {e}"))
            })?;
            stores.push(Arc::new(store));
        }
        Ok(Self { stores })
    }

    /// Builds a pool over pre-constructed handles. This is the seam the
    /// tests use to inject in-process stores.
    pub fn from_stores(stores: Vec<Arc<dyn MetricStore>>) -> Self {
        Self { stores }
    }

    pub fn handles(&self) -> &[Arc<dyn MetricStore>] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
