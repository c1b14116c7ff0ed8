use serde::{Deserialize, Serialize};
use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for scan executions. Thread-local so
/// concurrent test threads never contend or cross-pollute.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub indexes: BTreeMap<String, IndexCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Scan entrypoints
    pub scan_opens: u64,

    // Plan kinds
    pub plan_range: u64,
    pub plan_empty: u64,

    // Rows touched
    pub rows_yielded: u64,
    pub entries_visited: u64,
    pub predicate_rejections: u64,

    // Early terminations
    pub cooperative_stops: u64,
}

///
/// IndexCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IndexCounters {
    pub scan_opens: u64,
    pub rows_yielded: u64,
    pub entries_visited: u64,
    pub predicate_rejections: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Process-thread counters accumulated since the last reset.
    pub counters: EventState,
    /// Per-index counters plus derived averages.
    pub index_counters: Vec<IndexSummary>,
}

///
/// IndexSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IndexSummary {
    pub index: String,
    pub scan_opens: u64,
    pub rows_yielded: u64,
    pub entries_visited: u64,
    pub predicate_rejections: u64,
    pub avg_rows_per_scan: f64,
    pub avg_entries_per_scan: f64,
}

/// Build a metrics report by inspecting in-memory counters only.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut index_counters: Vec<IndexSummary> = Vec::new();
    for (index, ops) in &snap.indexes {
        let avg_rows = if ops.scan_opens > 0 {
            ops.rows_yielded as f64 / ops.scan_opens as f64
        } else {
            0.0
        };
        let avg_entries = if ops.scan_opens > 0 {
            ops.entries_visited as f64 / ops.scan_opens as f64
        } else {
            0.0
        };

        index_counters.push(IndexSummary {
            index: index.clone(),
            scan_opens: ops.scan_opens,
            rows_yielded: ops.rows_yielded,
            entries_visited: ops.entries_visited,
            predicate_rejections: ops.predicate_rejections,
            avg_rows_per_scan: avg_rows,
            avg_entries_per_scan: avg_entries,
        });
    }

    index_counters.sort_by(|a, b| {
        match b
            .avg_entries_per_scan
            .partial_cmp(&a.avg_entries_per_scan)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => match b.entries_visited.cmp(&a.entries_visited) {
                Ordering::Equal => a.index.cmp(&b.index),
                other => other,
            },
            other => other,
        }
    });

    EventReport {
        counters: snap,
        index_counters,
    }
}

///
/// TESTS
///

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn reset_all_clears_state() {
        with_state_mut(|m| {
            m.ops.scan_opens = 3;
            m.ops.plan_empty = 2;
            m.indexes.insert(
                "alpha_idx".to_string(),
                IndexCounters {
                    scan_opens: 1,
                    ..Default::default()
                },
            );
        });

        reset_all();

        with_state(|m| {
            assert_eq!(m.ops.scan_opens, 0);
            assert_eq!(m.ops.plan_empty, 0);
            assert!(m.indexes.is_empty());
        });
    }

    #[test]
    fn report_sorts_indexes_by_average_entries() {
        reset_all();
        with_state_mut(|m| {
            m.indexes.insert(
                "alpha_idx".to_string(),
                IndexCounters {
                    scan_opens: 2,
                    entries_visited: 6,
                    ..Default::default()
                },
            );
            m.indexes.insert(
                "beta_idx".to_string(),
                IndexCounters {
                    scan_opens: 1,
                    entries_visited: 5,
                    ..Default::default()
                },
            );
            m.indexes.insert(
                "gamma_idx".to_string(),
                IndexCounters {
                    scan_opens: 2,
                    entries_visited: 6,
                    ..Default::default()
                },
            );
        });

        let report = report();
        let names: Vec<_> = report
            .index_counters
            .iter()
            .map(|e| e.index.as_str())
            .collect();

        // Order by avg entries per scan desc, then entries_visited desc,
        // then index name asc.
        assert_eq!(names, ["beta_idx", "alpha_idx", "gamma_idx"]);
        assert_eq!(report.index_counters[0].avg_entries_per_scan, 5.0);
        assert_eq!(report.index_counters[1].avg_entries_per_scan, 3.0);
        assert_eq!(report.index_counters[2].avg_entries_per_scan, 3.0);
    }
}
