//! Module: exec::instrument
//! Responsibility: transparent counting wrapper around a consumed index.
//! Boundary: delegates every call; observation must not change scan results.

use crate::{
    colocation::ColocationGroup,
    error::ScanError,
    index::{ColumnSet, IndexCursor, IndexEntry, OpenedCursor, SortedIndex, range::RawRange},
    model::IndexModel,
    value::NullOrder,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

///
/// InstrumentedIndex
///
/// Wraps any `SortedIndex` and counts cursor opens and entries served.
/// Used to assert how many candidates a scan shape actually touched, without
/// disturbing ordering, pruning, or projection.
///

pub struct InstrumentedIndex {
    inner: Arc<dyn SortedIndex>,
    cursor_opens: Arc<AtomicU64>,
    entries_served: Arc<AtomicU64>,
}

impl InstrumentedIndex {
    #[must_use]
    pub fn new(inner: Arc<dyn SortedIndex>) -> Self {
        Self {
            inner,
            cursor_opens: Arc::new(AtomicU64::new(0)),
            entries_served: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of cursors opened through this wrapper.
    #[must_use]
    pub fn cursor_opens(&self) -> u64 {
        self.cursor_opens.load(Ordering::Relaxed)
    }

    /// Number of entries handed out across all cursors.
    #[must_use]
    pub fn entries_served(&self) -> u64 {
        self.entries_served.load(Ordering::Relaxed)
    }
}

impl SortedIndex for InstrumentedIndex {
    fn model(&self) -> &Arc<IndexModel> {
        self.inner.model()
    }

    fn null_order(&self) -> NullOrder {
        self.inner.null_order()
    }

    fn open_cursor(
        &self,
        range: &RawRange,
        group: &ColocationGroup,
        projection: Option<ColumnSet>,
    ) -> Result<OpenedCursor, ScanError> {
        let opened = self.inner.open_cursor(range, group, projection)?;
        self.cursor_opens.fetch_add(1, Ordering::Relaxed);

        Ok(OpenedCursor {
            cursor: Box::new(CountingCursor {
                inner: opened.cursor,
                entries_served: self.entries_served.clone(),
            }),
            pruning: opened.pruning,
        })
    }
}

struct CountingCursor {
    inner: Box<dyn IndexCursor>,
    entries_served: Arc<AtomicU64>,
}

impl IndexCursor for CountingCursor {
    fn next_entry(&mut self) -> Result<Option<IndexEntry>, ScanError> {
        let entry = self.inner.next_entry()?;
        if entry.is_some() {
            self.entries_served.fetch_add(1, Ordering::Relaxed);
        }

        Ok(entry)
    }
}

///
/// TESTS
///
