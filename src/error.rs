use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error taxonomy.
///
/// `Config` only ever occurs at startup and is fatal. `Store` and
/// `Serialization` are per-attempt failures that the coordinator and
/// aggregator recover from locally (log, skip the store, carry on).
/// `WriteTimeout` is the one operational error a caller can see.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no store acknowledged the write within {}ms", .0.as_millis())]
    WriteTimeout(Duration),

    #[error("store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
