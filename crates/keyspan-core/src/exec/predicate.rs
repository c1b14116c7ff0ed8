//! Module: exec::predicate
//! Responsibility: residual row predicates and their AND-composition.
//! Does not own: bound lowering or cursor traversal.
//! Boundary: the scan stream calls `PredicateChain::admit` once per candidate
//! entry; every stage sees the candidate at most once.

use crate::{
    context::ExecutionContext,
    error::{PredicateFailure, ScanError},
    value::Row,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

///
/// RowPredicate
///
/// Caller-supplied residual filter over candidate rows. Failures propagate
/// verbatim; they never degrade a scan into "keep everything".
///

pub trait RowPredicate: Send + Sync {
    fn test(&self, ctx: &ExecutionContext, row: &Row) -> Result<bool, PredicateFailure>;
}

impl<F> RowPredicate for F
where
    F: Fn(&ExecutionContext, &Row) -> Result<bool, PredicateFailure> + Send + Sync,
{
    fn test(&self, ctx: &ExecutionContext, row: &Row) -> Result<bool, PredicateFailure> {
        self(ctx, row)
    }
}

/// Shared handle to a residual predicate.
pub type PredicateRef = Arc<dyn RowPredicate>;

///
/// PredicateChain
///
/// Ordered AND-composition of residual predicates. Stages run left to right
/// and short-circuit on the first rejection, so for each candidate every
/// stage is invoked at most once and stages after a rejection not at all.
///

#[derive(Clone, Default)]
pub struct PredicateChain {
    stages: Vec<PredicateRef>,
}

impl PredicateChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage after the existing ones.
    pub fn append(&mut self, stage: PredicateRef) {
        self.stages.push(stage);
    }

    /// Add a stage before the existing ones. Wrapping layers use this to
    /// observe candidates ahead of the caller's own filters.
    pub fn prepend(&mut self, stage: PredicateRef) {
        self.stages.insert(0, stage);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Run the chain against one candidate. An empty chain admits everything.
    pub fn admit(&self, ctx: &ExecutionContext, row: &Row) -> Result<bool, ScanError> {
        for stage in &self.stages {
            let admitted = stage.test(ctx, row).map_err(ScanError::predicate_failure)?;
            if !admitted {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

///
/// CountingPredicate
///
/// Wrapper that counts invocations of an inner predicate. Shared counter so
/// callers can assert invocation counts after the scan completes.
///

pub struct CountingPredicate {
    inner: PredicateRef,
    invocations: Arc<AtomicU64>,
}

impl CountingPredicate {
    #[must_use]
    pub fn new(inner: PredicateRef) -> Self {
        Self {
            inner,
            invocations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle to the shared invocation counter.
    #[must_use]
    pub fn counter(&self) -> Arc<AtomicU64> {
        self.invocations.clone()
    }
}

impl RowPredicate for CountingPredicate {
    fn test(&self, ctx: &ExecutionContext, row: &Row) -> Result<bool, PredicateFailure> {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.inner.test(ctx, row)
    }
}

/// Predicate that admits every row. Useful as a counting probe's inner stage.
#[must_use]
pub fn always_true() -> PredicateRef {
    Arc::new(|_: &ExecutionContext, _: &Row| -> Result<bool, PredicateFailure> { Ok(true) })
}

///
/// TESTS
///
