//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! This module does not access index internals directly.
//! Scan-level accounting flows in through `obs::sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, IndexCounters, IndexSummary};
pub use sink::{
    MetricsEvent, MetricsSink, ScanPlanKind, metrics_report, metrics_reset_all, with_metrics_sink,
};
