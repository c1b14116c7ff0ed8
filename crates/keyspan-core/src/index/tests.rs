use crate::{
    colocation::{ColocationGroup, PartitionId},
    index::{
        ColumnSet, CursorPruning, MemSortedIndex, SortedIndex,
        key::{RawIndexKey, encode_components, prefix_successor},
        range::{LoweredRange, RawRange, lower_component_range},
    },
    model::{IndexField, IndexModel},
    value::{NullOrder, Value, canonical_cmp_with},
};
use proptest::prelude::*;
use std::{ops::Bound, sync::Arc};

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        any::<f64>().prop_map(Value::Float),
        "[a-z\\x00]{0,8}".prop_map(Value::Text),
    ]
}

fn encode_one(value: &Value, null_order: NullOrder) -> RawIndexKey {
    encode_components(std::slice::from_ref(value), null_order)
}

proptest! {
    #[test]
    fn encoded_byte_order_matches_canonical_order_nulls_first(
        left in arb_value(),
        right in arb_value(),
    ) {
        let expected = canonical_cmp_with(NullOrder::NullsFirst, &left, &right);
        let actual = encode_one(&left, NullOrder::NullsFirst)
            .cmp(&encode_one(&right, NullOrder::NullsFirst));
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn encoded_byte_order_matches_canonical_order_nulls_last(
        left in arb_value(),
        right in arb_value(),
    ) {
        let expected = canonical_cmp_with(NullOrder::NullsLast, &left, &right);
        let actual = encode_one(&left, NullOrder::NullsLast)
            .cmp(&encode_one(&right, NullOrder::NullsLast));
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn equality_envelope_contains_exactly_the_prefix_group(
        probe in any::<i64>(),
        others in prop::collection::vec(any::<i64>(), 0..24),
        second in any::<i64>(),
    ) {
        let lowered = lower_component_range(
            &[Value::Int(probe)],
            true,
            &[Value::Int(probe)],
            true,
            NullOrder::NullsFirst,
        );
        prop_assert!(matches!(lowered, LoweredRange::Range(_)));
        let LoweredRange::Range(range) = lowered else {
            unreachable!()
        };

        for first in others.iter().copied().chain([probe]) {
            // Composite stored keys: (first, second) plus entry suffix.
            let stored = encode_components(
                &[Value::Int(first), Value::Int(second)],
                NullOrder::NullsFirst,
            )
            .with_entry_suffix(7);

            prop_assert_eq!(raw_range_contains(&range, &stored), first == probe);
        }
    }

    #[test]
    fn prefix_successor_is_strictly_greater_than_all_extensions(
        prefix in prop::collection::vec(any::<u8>(), 1..12),
        extension in prop::collection::vec(any::<u8>(), 0..6),
    ) {
        if let Some(successor) = prefix_successor(&prefix) {
            let mut extended = prefix.clone();
            extended.extend_from_slice(&extension);
            prop_assert!(successor.as_slice() > extended.as_slice());
        } else {
            prop_assert!(prefix.iter().all(|byte| *byte == u8::MAX));
        }
    }
}

fn raw_range_contains(range: &RawRange, key: &RawIndexKey) -> bool {
    let above_lower = match &range.lower {
        Bound::Included(lower) => key >= lower,
        Bound::Excluded(lower) => key > lower,
        Bound::Unbounded => true,
    };
    let below_upper = match &range.upper {
        Bound::Included(upper) => key <= upper,
        Bound::Excluded(upper) => key < upper,
        Bound::Unbounded => true,
    };

    above_lower && below_upper
}

fn two_column_model() -> Arc<IndexModel> {
    IndexModel::try_new(
        "t_idx",
        "t",
        vec![IndexField::new("i1", 0), IndexField::new("i2", 1)],
    )
    .expect("model must build")
}

fn drain(cursor: &mut dyn crate::index::IndexCursor) -> Vec<crate::value::Row> {
    let mut rows = Vec::new();
    while let Some(entry) = cursor.next_entry().expect("cursor advance must succeed") {
        rows.push(entry.row);
    }
    rows
}

#[test]
fn cursor_yields_entries_in_ascending_key_order() {
    let index = MemSortedIndex::new(two_column_model());
    for (i1, i2) in [(3i64, 0i64), (1, 9), (2, 2), (1, 4)] {
        index
            .insert(vec![Value::Int(i1), Value::Int(i2)], PartitionId(0))
            .expect("insert must succeed");
    }

    let opened = index
        .open_cursor(&RawRange::unbounded(), &ColocationGroup::All, None)
        .expect("cursor must open");
    let mut cursor = opened.cursor;

    let keys: Vec<(i64, i64)> = drain(cursor.as_mut())
        .into_iter()
        .map(|row| match (&row[0], &row[1]) {
            (Value::Int(a), Value::Int(b)) => (*a, *b),
            other => panic!("unexpected row shape: {other:?}"),
        })
        .collect();

    assert_eq!(keys, vec![(1, 4), (1, 9), (2, 2), (3, 0)]);
}

#[test]
fn exact_pruning_filters_partitions_at_the_cursor() {
    let index = MemSortedIndex::new(two_column_model());
    for (i1, partition) in [(1i64, 0u16), (2, 1), (3, 0), (4, 2)] {
        index
            .insert(
                vec![Value::Int(i1), Value::Int(0)],
                PartitionId(partition),
            )
            .expect("insert must succeed");
    }

    let group = ColocationGroup::of([PartitionId(0)]);
    let opened = index
        .open_cursor(&RawRange::unbounded(), &group, None)
        .expect("cursor must open");
    assert_eq!(opened.pruning, CursorPruning::Exact);

    let mut cursor = opened.cursor;
    let rows = drain(cursor.as_mut());
    assert_eq!(rows.len(), 2);
}

#[test]
fn deferred_pruning_reports_its_capability_and_skips_nothing() {
    let index = MemSortedIndex::new(two_column_model()).with_deferred_pruning();
    index
        .insert(vec![Value::Int(1), Value::Int(0)], PartitionId(5))
        .expect("insert must succeed");

    let group = ColocationGroup::of([PartitionId(0)]);
    let opened = index
        .open_cursor(&RawRange::unbounded(), &group, None)
        .expect("cursor must open");
    assert_eq!(opened.pruning, CursorPruning::Deferred);

    // The executor owns membership checks on this path.
    let mut cursor = opened.cursor;
    assert_eq!(drain(cursor.as_mut()).len(), 1);
}

#[test]
fn dropped_index_refuses_new_cursors_but_keeps_open_snapshots() {
    let index = MemSortedIndex::new(two_column_model());
    index
        .insert(vec![Value::Int(1), Value::Int(0)], PartitionId(0))
        .expect("insert must succeed");

    let opened = index
        .open_cursor(&RawRange::unbounded(), &ColocationGroup::All, None)
        .expect("cursor must open");

    index.mark_dropped();
    assert!(
        index
            .open_cursor(&RawRange::unbounded(), &ColocationGroup::All, None)
            .is_err()
    );

    let mut cursor = opened.cursor;
    assert_eq!(drain(cursor.as_mut()).len(), 1);
}

#[test]
fn open_cursors_do_not_observe_later_inserts() {
    let index = MemSortedIndex::new(two_column_model());
    index
        .insert(vec![Value::Int(1), Value::Int(0)], PartitionId(0))
        .expect("insert must succeed");

    let opened = index
        .open_cursor(&RawRange::unbounded(), &ColocationGroup::All, None)
        .expect("cursor must open");

    index
        .insert(vec![Value::Int(2), Value::Int(0)], PartitionId(0))
        .expect("insert must succeed");

    let mut cursor = opened.cursor;
    assert_eq!(drain(cursor.as_mut()).len(), 1);
    assert_eq!(index.len(), 2);
}

#[test]
fn projection_narrows_rows_in_position_order() {
    let model = IndexModel::try_new("t_idx", "t", vec![IndexField::new("i1", 0)])
        .expect("model must build");
    let index = MemSortedIndex::new(model);
    index
        .insert(
            vec![Value::Int(1), Value::Text("a".into()), Value::Bool(true)],
            PartitionId(0),
        )
        .expect("insert must succeed");

    let projection = ColumnSet::from_positions([2, 0]).expect("column set must build");
    let opened = index
        .open_cursor(&RawRange::unbounded(), &ColocationGroup::All, Some(projection))
        .expect("cursor must open");

    let mut cursor = opened.cursor;
    let rows = drain(cursor.as_mut());
    assert_eq!(rows, vec![vec![Value::Int(1), Value::Bool(true)]]);
}

#[test]
fn duplicate_keys_coexist_through_entry_suffixes() {
    let index = MemSortedIndex::new(two_column_model());
    for _ in 0..3 {
        index
            .insert(vec![Value::Int(7), Value::Int(7)], PartitionId(0))
            .expect("insert must succeed");
    }

    assert_eq!(index.len(), 3);
}
