pub mod key;
pub mod mem;
pub mod range;
pub mod registry;

#[cfg(test)]
mod tests;

use crate::{
    colocation::{ColocationGroup, PartitionId},
    error::ScanError,
    index::{key::IndexKey, range::RawRange},
    model::IndexModel,
    value::{NullOrder, Row},
};
use std::sync::Arc;

// re-exports
pub use key::RawIndexKey;
pub use mem::MemSortedIndex;
pub use range::LoweredRange;
pub use registry::IndexRegistry;

///
/// ColumnSet
///
/// Set of table-column positions a consumer actually needs. An index may use
/// it to avoid materializing unneeded columns; honoring it is optional.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ColumnSet(u64);

impl ColumnSet {
    const MAX_POSITION: usize = 63;

    /// Build from column positions. Positions beyond the supported width are
    /// a caller error.
    pub fn from_positions(
        positions: impl IntoIterator<Item = usize>,
    ) -> Result<Self, ScanError> {
        let mut mask = 0u64;
        for position in positions {
            if position > Self::MAX_POSITION {
                return Err(ScanError::invalid_bound(format!(
                    "required column position {position} exceeds supported width {}",
                    Self::MAX_POSITION
                )));
            }
            mask |= 1u64 << position;
        }

        Ok(Self(mask))
    }

    #[must_use]
    pub const fn contains(&self, position: usize) -> bool {
        position <= Self::MAX_POSITION && self.0 & (1u64 << position) != 0
    }

    /// Member positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..=Self::MAX_POSITION).filter(|position| self.contains(*position))
    }

    /// Narrow a row to the member positions, in ascending position order.
    #[must_use]
    pub fn project(&self, row: &Row) -> Row {
        self.positions()
            .filter_map(|position| row.get(position).cloned())
            .collect()
    }
}

///
/// IndexEntry
///
/// One candidate produced by cursor advancement: the decoded key tuple, the
/// (possibly projected) row, and the owning partition.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexEntry {
    pub key: IndexKey,
    pub row: Row,
    pub partition: PartitionId,
}

///
/// CursorPruning
///
/// Whether the index applied the colocation restriction itself during the
/// seek, or left per-entry membership checks to the executor. Functionally
/// equivalent; `Exact` prunes earlier and cheaper.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorPruning {
    Exact,
    Deferred,
}

///
/// IndexCursor
///
/// Pull-based traversal over one raw key envelope. Range termination at the
/// upper bound is the cursor's job, since the index is ordered; exhaustion
/// is `Ok(None)`.
///

pub trait IndexCursor {
    fn next_entry(&mut self) -> Result<Option<IndexEntry>, ScanError>;
}

///
/// OpenedCursor
///
/// A positioned cursor plus the pruning capability the index honored for it.
///

pub struct OpenedCursor {
    pub cursor: Box<dyn IndexCursor>,
    pub pruning: CursorPruning,
}

///
/// SortedIndex
///
/// The consumed index contract: an ordered structure over a composite key
/// that can open range cursors. Read-shared across concurrent invocations;
/// each cursor is exclusively owned by its invocation.
///

pub trait SortedIndex: Send + Sync {
    /// Static model of this index.
    fn model(&self) -> &Arc<IndexModel>;

    /// NULL collation policy this index was built with.
    fn null_order(&self) -> NullOrder;

    /// Open a cursor positioned at the envelope's lower edge, restricted to
    /// the colocation group where the index supports partition-pruned seeks.
    ///
    /// Fails with `IndexUnavailable` when the index is gone or not ready.
    fn open_cursor(
        &self,
        range: &RawRange,
        group: &ColocationGroup,
        projection: Option<ColumnSet>,
    ) -> Result<OpenedCursor, ScanError>;
}
