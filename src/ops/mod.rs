//! Operational visibility for the store fleet. Counters and latency
//! percentiles only; nothing here feeds back into routing, so an
//! unhealthy store keeps its slot in the pool and simply keeps losing
//! races.

pub mod collector;
pub mod percentiles;

pub use collector::{OpsCollector, OpsSnapshot, QueryOutcome};
