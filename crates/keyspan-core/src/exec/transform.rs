//! Module: exec::transform
//! Responsibility: shaping accepted index entries into output rows.
//! Does not own: residual filtering; transforms run only on admitted entries.

use crate::{index::IndexEntry, value::Row};
use std::sync::Arc;

///
/// RowTransform
///
/// Final shaping step of a scan: maps one admitted index entry to the row
/// the caller receives. Applied after the residual predicate, so rejected
/// entries are never transformed.
///

pub trait RowTransform: Send + Sync {
    fn apply(&self, entry: IndexEntry) -> Row;
}

impl<F> RowTransform for F
where
    F: Fn(IndexEntry) -> Row + Send + Sync,
{
    fn apply(&self, entry: IndexEntry) -> Row {
        self(entry)
    }
}

/// Shared handle to a row transform.
pub type TransformRef = Arc<dyn RowTransform>;

///
/// IdentityTransform
///
/// Emits the stored table row unchanged.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransform;

impl RowTransform for IdentityTransform {
    fn apply(&self, entry: IndexEntry) -> Row {
        entry.row
    }
}

///
/// KeyTransform
///
/// Emits the decoded index key components instead of the table row. This is
/// the index-only path: consumers that need key columns alone never touch
/// row storage.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct KeyTransform;

impl RowTransform for KeyTransform {
    fn apply(&self, entry: IndexEntry) -> Row {
        entry.key.components().to_vec()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{IdentityTransform, KeyTransform, RowTransform};
    use crate::{
        colocation::PartitionId,
        index::{IndexEntry, key::IndexKey},
        value::Value,
    };

    fn entry() -> IndexEntry {
        IndexEntry {
            key: IndexKey::new(vec![Value::Int(2)]),
            row: vec![Value::Int(2), Value::Text("b".into())],
            partition: PartitionId(0),
        }
    }

    #[test]
    fn identity_emits_the_stored_row() {
        let row = IdentityTransform.apply(entry());

        assert_eq!(row, vec![Value::Int(2), Value::Text("b".into())]);
    }

    #[test]
    fn key_transform_emits_key_components() {
        let row = KeyTransform.apply(entry());

        assert_eq!(row, vec![Value::Int(2)]);
    }
}
