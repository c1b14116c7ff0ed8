//! Module: exec::join
//! Responsibility: correlated nested-loop join driving repeated inner scans.
//! Does not own: inner-scan semantics; it re-invokes the shared request.
//! Boundary: exactly one inner stream is live at a time, and each one is
//! closed before the next outer row opens its own.

use crate::{
    bound::{BoundComponent, BoundRow, BoundSupplier},
    context::ExecutionContext,
    error::ScanError,
    exec::scan::{ScanRequest, ScanStream},
    value::{Row, Value},
};
use std::collections::VecDeque;

///
/// JoinKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinKind {
    Inner,
    Left,
}

///
/// CorrelatedEqBound
///
/// Bound supplier for the correlated equality `inner.key = outer[column]`.
/// Re-evaluated on every inner invocation against the outer row installed in
/// the derived context. A NULL outer value produces a NULL equality bound,
/// which the bound evaluator resolves to zero inner rows under the default
/// policy; LEFT joins then pad, INNER joins skip.
///

#[derive(Clone, Copy, Debug)]
pub struct CorrelatedEqBound {
    outer_column: usize,
    key_width: usize,
}

impl CorrelatedEqBound {
    #[must_use]
    pub const fn new(outer_column: usize, key_width: usize) -> Self {
        Self {
            outer_column,
            key_width,
        }
    }
}

impl BoundSupplier for CorrelatedEqBound {
    fn bound_row(&self, ctx: &ExecutionContext) -> Result<BoundRow, ScanError> {
        let Some(outer) = ctx.outer_row() else {
            return Err(ScanError::invalid_bound(
                "correlated bound evaluated without an outer row in context",
            ));
        };
        let Some(value) = outer.get(self.outer_column) else {
            return Err(ScanError::invalid_bound(format!(
                "outer row of width {} has no column {}",
                outer.len(),
                self.outer_column
            )));
        };

        let mut components = vec![BoundComponent::Value(value.clone())];
        while components.len() < self.key_width {
            components.push(BoundComponent::Unbounded);
        }

        Ok(BoundRow::new(components))
    }
}

///
/// CorrelatedNestedLoopJoin
///
/// Join driver: for each outer row it derives a child context carrying that
/// row, begins a fresh inner scan invocation, and drains it before moving
/// on. Inner bound suppliers and predicates see each outer row through the
/// derived context, never through driver-side mutation.
///

pub struct CorrelatedNestedLoopJoin {
    inner: ScanRequest,
    kind: JoinKind,
    inner_width: usize,
}

impl CorrelatedNestedLoopJoin {
    /// `inner_width` is the output width of the inner scan, used to pad
    /// unmatched LEFT join rows with NULLs.
    #[must_use]
    pub const fn new(inner: ScanRequest, kind: JoinKind, inner_width: usize) -> Self {
        Self {
            inner,
            kind,
            inner_width,
        }
    }

    /// Drive the join over the given outer rows.
    #[must_use]
    pub fn run(&self, ctx: &ExecutionContext, outer_rows: Vec<Row>) -> JoinStream {
        JoinStream {
            ctx: ctx.clone(),
            inner: self.inner.clone(),
            kind: self.kind,
            inner_width: self.inner_width,
            outer_rows: outer_rows.into_iter().collect(),
            current: None,
        }
    }
}

struct ActiveOuter {
    outer_row: Row,
    stream: ScanStream,
    matched: bool,
}

///
/// JoinStream
///
/// Pull-based joined-row producer. Output rows are the outer row followed by
/// the inner scan's output columns.
///

pub struct JoinStream {
    ctx: ExecutionContext,
    inner: ScanRequest,
    kind: JoinKind,
    inner_width: usize,
    outer_rows: VecDeque<Row>,
    current: Option<ActiveOuter>,
}

impl JoinStream {
    pub fn next_row(&mut self) -> Result<Option<Row>, ScanError> {
        loop {
            if let Some(active) = &mut self.current {
                match active.stream.next_row()? {
                    Some(inner_row) => {
                        active.matched = true;
                        let mut joined = active.outer_row.clone();
                        joined.extend(inner_row);
                        return Ok(Some(joined));
                    }
                    None => {
                        let finished = self.current.take();
                        if let Some(mut finished) = finished {
                            finished.stream.close();
                            if self.kind == JoinKind::Left && !finished.matched {
                                let mut padded = finished.outer_row;
                                padded.extend(std::iter::repeat_n(
                                    Value::Null,
                                    self.inner_width,
                                ));
                                return Ok(Some(padded));
                            }
                        }
                    }
                }

                continue;
            }

            let Some(outer_row) = self.outer_rows.pop_front() else {
                return Ok(None);
            };

            // Fresh inner invocation per outer row; bounds re-evaluate against
            // the derived context at its first pull.
            let derived = self.ctx.with_outer_row(outer_row.clone());
            self.current = Some(ActiveOuter {
                outer_row,
                stream: self.inner.begin(&derived),
                matched: false,
            });
        }
    }

    /// Drain every remaining joined row.
    pub fn collect_rows(&mut self) -> Result<Vec<Row>, ScanError> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }

        Ok(rows)
    }
}
