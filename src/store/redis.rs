use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::warn;

use crate::error::Result;
use crate::sample::{MetricSample, QueryParameters};
use crate::store::MetricStore;

/// A single Redis instance acting as one redundant copy of the data.
///
/// Schema: one hash per metric name (`metrics:{name}`), one field per
/// sample id, JSON payload. Insert and query are each a single round-trip.
pub struct RedisStore {
    label: String,
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let label = client.get_connection_info().addr.to_string();
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { label, conn })
    }

    fn key(name: &str) -> String {
        format!("metrics:{name}")
    }
}

#[async_trait]
impl MetricStore for RedisStore {
    fn label(&self) -> &str {
        &self.label
    }

    async fn insert(&self, sample: &MetricSample) -> Result<()> {
        let payload = serde_json::to_string(sample)?;

        // Every clone shares the same auto-reconnecting multiplexed
        // connection, so handles stay cheap to fan out across tasks.
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("HSET")
            .arg(Self::key(&sample.name))
            .arg(&sample.id)
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn query(&self, query: &QueryParameters) -> Result<Vec<MetricSample>> {
        let mut conn = self.conn.clone();
        let rows: HashMap<String, String> =
            conn.hgetall(Self::key(&query.name)).await?;

        let mut samples = Vec::with_capacity(rows.len());
        for (id, payload) in rows {
            match serde_json::from_str::<MetricSample>(&payload) {
                Ok(sample) if query.matches(&sample) => samples.push(sample),
                // Parsed fine but outside the requested window.
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        store = %self.label,
                        %id,
                        error = %e,
                        "skipping unparseable row"
                    );
                }
            }
        }
        Ok(samples)
    }
}
