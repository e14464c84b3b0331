//! Observability: runtime counters and the sink they flow through.
//!
//! Engine code never touches counter state directly. It records
//! [`MetricsEvent`]s, which the active [`MetricsSink`] accumulates.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, TypeCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
