//! Module: context
//! Responsibility: per-query execution environment borrowed by each scan.
//! Does not own: scan state or cursor resources.
//! Boundary: the executor reads cancellation, deadline, config, and the
//! correlated outer-row slot here; it never retains the context past a scan.

use crate::{
    colocation::ColocationGroup,
    error::ScanError,
    value::{NullOrder, Row},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

///
/// NullBoundPolicy
///
/// Resolution of NULL components inside a range bound.
///
/// SQL equality against NULL is never true, so the default policy degrades
/// the affected scan to zero rows without consulting the index. The
/// alternative treats NULL as an ordinary key value placed by the index's
/// NULL collation, so bounds like `i1 > NULL` range over the encoded NULL
/// position instead.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NullBoundPolicy {
    #[default]
    MatchNothing,
    SortOrder,
}

///
/// ScanConfig
///
/// Environment-level scan configuration carried by the execution context.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanConfig {
    pub null_order: NullOrder,
    pub null_bound: NullBoundPolicy,
}

///
/// CancellationToken
///
/// Shared cooperative-stop flag. Cloning shares the flag; cancellation is
/// idempotent and observed at every cursor advancement.
///

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

///
/// ExecutionContext
///
/// Caller-owned environment for one query fragment: cancellation, deadline,
/// scan configuration, the active colocation group, and (for correlated
/// scans) the current outer row. Borrowed by the executor at open time.
///

#[derive(Clone, Debug)]
pub struct ExecutionContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
    config: ScanConfig,
    group: ColocationGroup,
    outer_row: Option<Row>,
}

impl ExecutionContext {
    #[must_use]
    pub fn new(group: ColocationGroup) -> Self {
        Self {
            cancellation: CancellationToken::new(),
            deadline: None,
            config: ScanConfig::default(),
            group,
            outer_row: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Derive a context carrying the given correlated outer row. Cancellation
    /// and deadline remain shared with the parent.
    #[must_use]
    pub fn with_outer_row(&self, row: Row) -> Self {
        let mut derived = self.clone();
        derived.outer_row = Some(row);
        derived
    }

    #[must_use]
    pub const fn config(&self) -> ScanConfig {
        self.config
    }

    #[must_use]
    pub const fn group(&self) -> &ColocationGroup {
        &self.group
    }

    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Current correlated outer row, if the enclosing driver installed one.
    #[must_use]
    pub fn outer_row(&self) -> Option<&Row> {
        self.outer_row.as_ref()
    }

    /// Check cancellation and deadline. Called at open and at every advance.
    pub fn check_live(&self) -> Result<(), ScanError> {
        if self.cancellation.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(ScanError::DeadlineExceeded);
        }

        Ok(())
    }
}

///
/// TESTS
///
