//! Module: exec::scan
//! Responsibility: lazy, cancellable range-scan execution over one index.
//! Does not own: bound semantics (bound module) or index storage.
//! Boundary: a `ScanRequest` is the reusable plan; every `begin` yields an
//! independent `ScanStream` whose work starts at the first pull.

use crate::{
    bound::{BoundRow, BoundSupplierRef, FixedBound, ResolvedBounds, evaluate_search_bounds},
    context::ExecutionContext,
    error::ScanError,
    exec::{
        predicate::{PredicateChain, PredicateRef},
        trace::{ScanTraceSink, TracePhase, TraceScope, scan_fingerprint},
        transform::{IdentityTransform, TransformRef},
    },
    index::{ColumnSet, CursorPruning, IndexCursor, SortedIndex},
    obs::sink::{MetricsEvent, ScanPlanKind, record},
    value::Row,
};
use std::sync::Arc;

///
/// ScanRequest
///
/// Declarative description of one index range scan: the index, per-invocation
/// bound suppliers with whole-prefix inclusivity, the residual predicate
/// chain, the output transform, and an optional column projection. Requests
/// are immutable once built and reusable across invocations; correlated
/// drivers call `begin` once per outer row.
///

#[derive(Clone)]
pub struct ScanRequest {
    index: Arc<dyn SortedIndex>,
    lower: BoundSupplierRef,
    upper: BoundSupplierRef,
    lower_inclusive: bool,
    upper_inclusive: bool,
    predicates: PredicateChain,
    transform: TransformRef,
    required_columns: Option<ColumnSet>,
    trace: Option<Arc<dyn ScanTraceSink>>,
}

impl ScanRequest {
    /// Unbounded scan over the whole index, identity output.
    #[must_use]
    pub fn new(index: Arc<dyn SortedIndex>) -> Self {
        let unbounded: BoundSupplierRef = Arc::new(FixedBound(BoundRow::unbounded()));

        Self {
            index,
            lower: unbounded.clone(),
            upper: unbounded,
            lower_inclusive: true,
            upper_inclusive: true,
            predicates: PredicateChain::new(),
            transform: Arc::new(IdentityTransform),
            required_columns: None,
            trace: None,
        }
    }

    /// Restrict the lower edge. Inclusivity applies to the whole bound-row
    /// prefix group.
    #[must_use]
    pub fn lower_bound(mut self, supplier: BoundSupplierRef, inclusive: bool) -> Self {
        self.lower = supplier;
        self.lower_inclusive = inclusive;
        self
    }

    /// Restrict the upper edge.
    #[must_use]
    pub fn upper_bound(mut self, supplier: BoundSupplierRef, inclusive: bool) -> Self {
        self.upper = supplier;
        self.upper_inclusive = inclusive;
        self
    }

    /// Equality probe: both edges fixed to the same bound row, inclusive.
    #[must_use]
    pub fn probe(self, row: BoundRow) -> Self {
        let supplier: BoundSupplierRef = Arc::new(FixedBound(row));
        self.lower_bound(supplier.clone(), true)
            .upper_bound(supplier, true)
    }

    /// Correlated probe: both edges driven by the same supplier, re-evaluated
    /// per invocation.
    #[must_use]
    pub fn probe_with(self, supplier: BoundSupplierRef) -> Self {
        self.lower_bound(supplier.clone(), true)
            .upper_bound(supplier, true)
    }

    /// Append a residual predicate stage after the existing ones.
    #[must_use]
    pub fn filter(mut self, predicate: PredicateRef) -> Self {
        self.predicates.append(predicate);
        self
    }

    /// Insert a residual predicate stage before the existing ones.
    #[must_use]
    pub fn prepend_filter(mut self, predicate: PredicateRef) -> Self {
        self.predicates.prepend(predicate);
        self
    }

    /// Replace the output transform.
    #[must_use]
    pub fn with_transform(mut self, transform: TransformRef) -> Self {
        self.transform = transform;
        self
    }

    /// Advertise the column positions the consumer needs, letting the index
    /// skip materializing the rest. Predicates and transforms then observe
    /// the narrowed row.
    #[must_use]
    pub const fn with_required_columns(mut self, columns: ColumnSet) -> Self {
        self.required_columns = Some(columns);
        self
    }

    /// Install a trace sink for this request's invocations.
    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn ScanTraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Start one scan invocation. No bound evaluation, cursor opening, or
    /// index access happens here; all work is deferred to the first pull.
    #[must_use]
    pub fn begin(&self, ctx: &ExecutionContext) -> ScanStream {
        ScanStream {
            ctx: ctx.clone(),
            index: self.index.clone(),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            lower_inclusive: self.lower_inclusive,
            upper_inclusive: self.upper_inclusive,
            predicates: self.predicates.clone(),
            transform: self.transform.clone(),
            required_columns: self.required_columns,
            trace: self.trace.clone(),
            state: StreamState::Unopened,
            scope: None,
            rows_yielded: 0,
            entries_visited: 0,
            predicate_rejections: 0,
            started: false,
            finished: false,
        }
    }
}

///
/// ScanState
///
/// Observable lifecycle of one scan invocation. Bounds are evaluated inside
/// the first pull, between `Unopened` and `CursorOpen`; an unsatisfiable or
/// empty-group invocation jumps straight to `Exhausted` without ever opening
/// a cursor.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanState {
    Unopened,
    CursorOpen,
    Exhausted,
    Closed,
}

enum StreamState {
    Unopened,
    Open {
        cursor: Box<dyn IndexCursor>,
        deferred_pruning: bool,
    },
    Exhausted,
    Closed,
}

///
/// ScanStream
///
/// One scan invocation. Pull-based: each `next_row` call checks liveness,
/// advances the cursor, applies the predicate chain once per candidate, and
/// transforms admitted entries. Errors close the stream; `close` is
/// idempotent and pulls after it yield `Ok(None)`.
///

pub struct ScanStream {
    ctx: ExecutionContext,
    index: Arc<dyn SortedIndex>,
    lower: BoundSupplierRef,
    upper: BoundSupplierRef,
    lower_inclusive: bool,
    upper_inclusive: bool,
    predicates: PredicateChain,
    transform: TransformRef,
    required_columns: Option<ColumnSet>,
    trace: Option<Arc<dyn ScanTraceSink>>,
    state: StreamState,
    scope: Option<TraceScope>,
    rows_yielded: u64,
    entries_visited: u64,
    predicate_rejections: u64,
    started: bool,
    finished: bool,
}

impl ScanStream {
    /// Pull the next output row.
    pub fn next_row(&mut self) -> Result<Option<Row>, ScanError> {
        loop {
            match self.state() {
                ScanState::Exhausted | ScanState::Closed => return Ok(None),
                ScanState::Unopened => self.open()?,
                ScanState::CursorOpen => return self.advance(),
            }
        }
    }

    /// Observable lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ScanState {
        match self.state {
            StreamState::Unopened => ScanState::Unopened,
            StreamState::Open { .. } => ScanState::CursorOpen,
            StreamState::Exhausted => ScanState::Exhausted,
            StreamState::Closed => ScanState::Closed,
        }
    }

    #[must_use]
    pub const fn rows_yielded(&self) -> u64 {
        self.rows_yielded
    }

    #[must_use]
    pub const fn entries_visited(&self) -> u64 {
        self.entries_visited
    }

    #[must_use]
    pub const fn predicate_rejections(&self) -> u64 {
        self.predicate_rejections
    }

    /// Release cursor resources and flush accounting. Idempotent; later
    /// pulls yield `Ok(None)`.
    pub fn close(&mut self) {
        if matches!(self.state, StreamState::Closed) {
            return;
        }

        self.state = StreamState::Closed;
        self.flush_accounting();
    }

    /// First-pull work: liveness, bound evaluation (exactly once), colocation
    /// short-circuit, cursor opening.
    fn open(&mut self) -> Result<(), ScanError> {
        if let Err(err) = self.ctx.check_live() {
            return Err(self.fail(err));
        }

        let model = self.index.model().clone();
        self.started = true;
        record(MetricsEvent::ScanStart {
            index: model.name.clone(),
        });
        if let Some(sink) = &self.trace {
            let fingerprint = scan_fingerprint(
                &model,
                self.ctx.group(),
                self.lower_inclusive,
                self.upper_inclusive,
            );
            self.scope = Some(TraceScope::start(sink.clone(), fingerprint));
        }

        // An empty target group can never match; the index is not consulted.
        if self.ctx.group().is_empty() {
            record(MetricsEvent::Plan {
                kind: ScanPlanKind::Empty,
            });
            self.state = StreamState::Exhausted;
            self.flush_accounting();
            return Ok(());
        }

        let resolved = match evaluate_search_bounds(
            &self.ctx,
            &model,
            self.lower.as_ref(),
            self.upper.as_ref(),
            self.lower_inclusive,
            self.upper_inclusive,
        ) {
            Ok(resolved) => resolved,
            Err(err) => return Err(self.fail(err)),
        };
        if let Some(scope) = &self.scope {
            scope.phase(TracePhase::Bounds, 0);
        }

        match resolved {
            ResolvedBounds::Unsatisfiable => {
                record(MetricsEvent::Plan {
                    kind: ScanPlanKind::Empty,
                });
                self.state = StreamState::Exhausted;
                self.flush_accounting();
            }
            ResolvedBounds::Range(range) => {
                record(MetricsEvent::Plan {
                    kind: ScanPlanKind::Range,
                });

                let opened =
                    match self
                        .index
                        .open_cursor(&range, self.ctx.group(), self.required_columns)
                    {
                        Ok(opened) => opened,
                        Err(err) => return Err(self.fail(err)),
                    };
                if let Some(scope) = &self.scope {
                    scope.phase(TracePhase::CursorOpen, 0);
                }

                self.state = StreamState::Open {
                    cursor: opened.cursor,
                    deferred_pruning: opened.pruning == CursorPruning::Deferred,
                };
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> Result<Option<Row>, ScanError> {
        loop {
            if let Err(err) = self.ctx.check_live() {
                return Err(self.fail(err));
            }

            let (next, deferred_pruning) = {
                let StreamState::Open {
                    cursor,
                    deferred_pruning,
                } = &mut self.state
                else {
                    return Ok(None);
                };
                (cursor.next_entry(), *deferred_pruning)
            };

            let entry = match next {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    self.state = StreamState::Exhausted;
                    self.flush_accounting();
                    return Ok(None);
                }
                Err(err) => return Err(self.fail(err)),
            };
            self.entries_visited = self.entries_visited.saturating_add(1);

            // Deferred-pruning indexes hand back every partition; membership
            // is checked here, before the predicate chain runs.
            if deferred_pruning && !self.ctx.group().contains(entry.partition) {
                continue;
            }

            match self.predicates.admit(&self.ctx, &entry.row) {
                Ok(true) => {}
                Ok(false) => {
                    self.predicate_rejections = self.predicate_rejections.saturating_add(1);
                    continue;
                }
                Err(err) => return Err(self.fail(err)),
            }

            self.rows_yielded = self.rows_yielded.saturating_add(1);
            return Ok(Some(self.transform.apply(entry)));
        }
    }

    /// Error exit: record cooperative stops, trace the class, close.
    fn fail(&mut self, err: ScanError) -> ScanError {
        if err.is_cooperative_stop() {
            record(MetricsEvent::CooperativeStop {
                index: self.index.model().name.clone(),
            });
        }
        if let Some(scope) = &self.scope {
            scope.error(err.class());
        }

        self.state = StreamState::Closed;
        self.flush_accounting();

        err
    }

    /// Emit finish accounting exactly once per invocation, no matter how the
    /// stream ends.
    fn flush_accounting(&mut self) {
        // A stream abandoned before its first pull never started a scan and
        // must not emit a dangling finish event.
        if self.finished || !self.started {
            return;
        }
        self.finished = true;

        record(MetricsEvent::ScanFinish {
            index: self.index.model().name.clone(),
            rows_yielded: self.rows_yielded,
            entries_visited: self.entries_visited,
            predicate_rejections: self.predicate_rejections,
        });
        if let Some(scope) = &self.scope {
            scope.finish(self.rows_yielded);
        }
    }
}

impl Drop for ScanStream {
    fn drop(&mut self) {
        self.close();
    }
}
