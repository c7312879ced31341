use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Domain types ────────────────────────────────────────────────

/// One stored metric sample.
///
/// The id is assigned by the write coordinator exactly once, before any
/// store sees the sample, and the same id is sent to every store; that
/// shared id is what makes cross-store deduplication possible on reads.
/// A sample is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub id: String,
    pub name: String,
    /// When the coordinator accepted the sample.
    pub at: DateTime<Utc>,
    pub count: f64,
    pub mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perc95: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perc99: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<f64>,
}

/// Inbound sample as the client sends it: everything but the identity.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleDraft {
    pub name: String,
    pub count: f64,
    pub mean: f64,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub perc95: Option<f64>,
    #[serde(default)]
    pub perc99: Option<f64>,
    #[serde(default)]
    pub last: Option<f64>,
}

impl SampleDraft {
    /// The only way to turn a draft into a sample: stamp identity and time.
    pub fn into_sample(self, id: String) -> MetricSample {
        MetricSample {
            id,
            name: self.name,
            at: Utc::now(),
            count: self.count,
            mean: self.mean,
            median: self.median,
            min: self.min,
            max: self.max,
            perc95: self.perc95,
            perc99: self.perc99,
            last: self.last,
        }
    }
}

// ─── Query parameters ────────────────────────────────────────────

/// What the caller is asking for. Built once per read request by the
/// boundary and handed unchanged to every store in the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParameters {
    pub name: String,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    /// Opaque to this service; an adapter for a bucketing store would use
    /// it. The Redis adapter keeps a single resolution and ignores it.
    #[serde(default)]
    pub resolution: Option<String>,
}

impl QueryParameters {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: None,
            to: None,
            resolution: None,
        }
    }

    /// Time-window check applied by store adapters after row retrieval.
    pub fn matches(&self, sample: &MetricSample) -> bool {
        if let Some(from) = self.from {
            if sample.at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if sample.at > to {
                return false;
            }
        }
        true
    }
}

// ─── Result set ──────────────────────────────────────────────────

/// Union of per-store query results, deduplicated by sample id.
///
/// First sample seen for an id wins and later duplicates are dropped.
/// Which store's copy "won" is deliberately unspecified; all stores
/// should hold equivalent content for one id.
#[derive(Debug, Default)]
pub struct ResultSet {
    samples: Vec<MetricSample>,
    seen: HashSet<String>,
}

impl ResultSet {
    /// Adds a sample unless its id is already present. Returns whether
    /// the sample was kept.
    pub fn insert(&mut self, sample: MetricSample) -> bool {
        if self.seen.contains(&sample.id) {
            return false;
        }
        self.seen.insert(sample.id.clone());
        self.samples.push(sample);
        true
    }

    /// Folds one store's rows into the set.
    pub fn merge(&mut self, rows: Vec<MetricSample>) {
        for sample in rows {
            self.insert(sample);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSample> {
        self.samples.iter()
    }

    pub fn into_vec(self) -> Vec<MetricSample> {
        self.samples
    }
}

// ─── Tests ───────────────────────────────────────────────────────
