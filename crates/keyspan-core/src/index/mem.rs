//! Module: index::mem
//! Responsibility: in-memory reference implementation of `SortedIndex`.
//! Does not own: bound evaluation or residual filtering.
//! Boundary: cursors operate on immutable snapshots; writers swap snapshots
//! so concurrent readers never observe a half-applied mutation.

use crate::{
    colocation::{ColocationGroup, PartitionId},
    error::ScanError,
    index::{
        ColumnSet, CursorPruning, IndexCursor, IndexEntry, OpenedCursor, SortedIndex,
        key::{IndexKey, RawIndexKey, encode_components},
        range::RawRange,
    },
    model::IndexModel,
    value::{NullOrder, Row},
};
use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

type Snapshot = Arc<BTreeMap<RawIndexKey, Arc<StoredEntry>>>;

#[derive(Debug)]
struct StoredEntry {
    key: Vec<crate::value::Value>,
    row: Row,
    partition: PartitionId,
}

///
/// MemSortedIndex
///
/// BTree-backed sorted index over canonical raw keys. Non-unique keys stay
/// unique in the map through an entry-discriminator suffix. Suitable for
/// embedding, local partitions, and the executor test surface.
///

pub struct MemSortedIndex {
    model: Arc<IndexModel>,
    null_order: NullOrder,
    pruning: CursorPruning,
    available: AtomicBool,
    next_entry_id: AtomicU64,
    entries: RwLock<Snapshot>,
}

impl MemSortedIndex {
    #[must_use]
    pub fn new(model: Arc<IndexModel>) -> Self {
        Self {
            model,
            null_order: NullOrder::NullsFirst,
            pruning: CursorPruning::Exact,
            available: AtomicBool::new(true),
            next_entry_id: AtomicU64::new(0),
            entries: RwLock::new(Arc::new(BTreeMap::new())),
        }
    }

    #[must_use]
    pub const fn with_null_order(mut self, null_order: NullOrder) -> Self {
        self.null_order = null_order;
        self
    }

    /// Disable partition-pruned seeks, leaving colocation membership checks
    /// to the executor. Exercises the per-entry filtering path.
    #[must_use]
    pub const fn with_deferred_pruning(mut self) -> Self {
        self.pruning = CursorPruning::Deferred;
        self
    }

    /// Insert one table row owned by the given partition.
    pub fn insert(&self, row: Row, partition: PartitionId) -> Result<(), ScanError> {
        let key = self.model.key_of(&row)?;
        let entry_id = self.next_entry_id.fetch_add(1, Ordering::Relaxed);
        let raw = encode_components(&key, self.null_order).with_entry_suffix(entry_id);

        let entry = Arc::new(StoredEntry {
            key,
            row,
            partition,
        });

        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut next = BTreeMap::clone(&guard);
        next.insert(raw, entry);
        *guard = Arc::new(next);

        Ok(())
    }

    /// Simulate a concurrent drop: subsequent opens fail with
    /// `IndexUnavailable` while already-open cursors keep their snapshot.
    pub fn mark_dropped(&self) {
        self.available.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Snapshot {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl SortedIndex for MemSortedIndex {
    fn model(&self) -> &Arc<IndexModel> {
        &self.model
    }

    fn null_order(&self) -> NullOrder {
        self.null_order
    }

    fn open_cursor(
        &self,
        range: &RawRange,
        group: &ColocationGroup,
        projection: Option<ColumnSet>,
    ) -> Result<OpenedCursor, ScanError> {
        if !self.available.load(Ordering::Acquire) {
            return Err(ScanError::index_unavailable(self.model.name.clone()));
        }

        let prune = match self.pruning {
            CursorPruning::Exact => Some(group.clone()),
            CursorPruning::Deferred => None,
        };

        Ok(OpenedCursor {
            cursor: Box::new(MemCursor {
                snapshot: self.snapshot(),
                position: None,
                lower: range.lower.clone(),
                upper: range.upper.clone(),
                prune,
                projection,
            }),
            pruning: self.pruning,
        })
    }
}

///
/// MemCursor
///
/// Snapshot cursor that re-seeks past its last position on every pull. The
/// snapshot is immutable, so advancement never observes concurrent writes.
///

struct MemCursor {
    snapshot: Snapshot,
    position: Option<RawIndexKey>,
    lower: Bound<RawIndexKey>,
    upper: Bound<RawIndexKey>,
    prune: Option<ColocationGroup>,
    projection: Option<ColumnSet>,
}

impl IndexCursor for MemCursor {
    fn next_entry(&mut self) -> Result<Option<IndexEntry>, ScanError> {
        loop {
            let start = match self.position.take() {
                Some(last) => Bound::Excluded(last),
                None => self.lower.clone(),
            };

            let Some((raw, stored)) = self
                .snapshot
                .range((start, self.upper.clone()))
                .next()
                .map(|(raw, stored)| (raw.clone(), stored.clone()))
            else {
                return Ok(None);
            };

            self.position = Some(raw);

            if let Some(group) = &self.prune
                && !group.contains(stored.partition)
            {
                continue;
            }

            let row = self.projection.as_ref().map_or_else(
                || stored.row.clone(),
                |projection| projection.project(&stored.row),
            );

            return Ok(Some(IndexEntry {
                key: IndexKey::new(stored.key.clone()),
                row,
                partition: stored.partition,
            }));
        }
    }
}
