//! Metrics sink boundary.
//!
//! Executor logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between execution logic
//! and the thread-local metrics state.
use crate::obs::metrics;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// ScanPlanKind
///

#[derive(Clone, Copy, Debug)]
pub enum ScanPlanKind {
    /// Bounds lowered to a traversable raw envelope.
    Range,
    /// Bounds or colocation proved the result empty before any cursor opened.
    Empty,
}

///
/// MetricsEvent
///

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    ScanStart {
        index: String,
    },
    ScanFinish {
        index: String,
        rows_yielded: u64,
        entries_visited: u64,
        predicate_rejections: u64,
    },
    CooperativeStop {
        index: String,
    },
    Plan {
        kind: ScanPlanKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ScanStart { index } => {
                metrics::with_state_mut(|m| {
                    m.ops.scan_opens = m.ops.scan_opens.saturating_add(1);
                    let entry = m.indexes.entry(index).or_default();
                    entry.scan_opens = entry.scan_opens.saturating_add(1);
                });
            }

            MetricsEvent::ScanFinish {
                index,
                rows_yielded,
                entries_visited,
                predicate_rejections,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_yielded = m.ops.rows_yielded.saturating_add(rows_yielded);
                    m.ops.entries_visited = m.ops.entries_visited.saturating_add(entries_visited);
                    m.ops.predicate_rejections = m
                        .ops
                        .predicate_rejections
                        .saturating_add(predicate_rejections);

                    let entry = m.indexes.entry(index).or_default();
                    entry.rows_yielded = entry.rows_yielded.saturating_add(rows_yielded);
                    entry.entries_visited = entry.entries_visited.saturating_add(entries_visited);
                    entry.predicate_rejections = entry
                        .predicate_rejections
                        .saturating_add(predicate_rejections);
                });
            }

            MetricsEvent::CooperativeStop { index: _ } => {
                metrics::with_state_mut(|m| {
                    m.ops.cooperative_stops = m.ops.cooperative_stops.saturating_add(1);
                });
            }

            MetricsEvent::Plan { kind } => {
                metrics::with_state_mut(|m| match kind {
                    ScanPlanKind::Range => m.ops.plan_range = m.ops.plan_range.saturating_add(1),
                    ScanPlanKind::Empty => m.ops.plan_empty = m.ops.plan_empty.saturating_add(1),
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - We materialize only a shared reference (`&dyn MetricsSink`), matching the
        //   original shared borrow used to install the override.
        // - No mutable alias to the same sink is created here.
        //
        // What would break this:
        // - If `with_metrics_sink` failed to restore on all exits (normal + panic),
        //   `ptr` could outlive the borrowed sink and become dangling.
        // - If `record` were changed to store or dispatch asynchronously using `ptr`,
        //   lifetime assumptions would no longer hold.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Preconditions:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` always restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    //
    // Aliasing:
    // - We erase lifetime to a raw pointer, but still only expose shared access.
    // - No mutable alias to the same sink is introduced by this conversion.
    //
    // What would break this:
    // - Any async/deferred use of `sink_ptr` beyond this scope.
    // - Any path that bypasses Guard restoration.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}
