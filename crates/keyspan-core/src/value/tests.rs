use crate::value::{NullOrder, Value, canonical_cmp, canonical_cmp_with, strict_order_cmp};
use std::cmp::Ordering;

#[test]
fn canonical_cmp_orders_within_variant() {
    assert_eq!(
        canonical_cmp(&Value::Int(-3), &Value::Int(7)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Text("a".into()), &Value::Text("b".into())),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Float(-0.5), &Value::Float(0.5)),
        Ordering::Less
    );
}

#[test]
fn canonical_cmp_orders_across_variants_by_rank() {
    // Bool < Int < Uint < Float < Text, regardless of payload.
    assert_eq!(
        canonical_cmp(&Value::Bool(true), &Value::Int(i64::MIN)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Uint(u64::MAX), &Value::Float(0.0)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Float(f64::INFINITY), &Value::Text(String::new())),
        Ordering::Less
    );
}

#[test]
fn null_collation_policy_flips_null_placement() {
    let null = Value::Null;
    let zero = Value::Int(0);

    assert_eq!(
        canonical_cmp_with(NullOrder::NullsFirst, &null, &zero),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp_with(NullOrder::NullsLast, &null, &zero),
        Ordering::Greater
    );
    assert_eq!(
        canonical_cmp_with(NullOrder::NullsLast, &null, &null),
        Ordering::Equal
    );
}

#[test]
fn strict_order_cmp_rejects_null_and_mixed_variants() {
    assert_eq!(strict_order_cmp(&Value::Null, &Value::Int(1)), None);
    assert_eq!(strict_order_cmp(&Value::Int(1), &Value::Null), None);
    assert_eq!(strict_order_cmp(&Value::Int(1), &Value::Uint(1)), None);
    assert_eq!(
        strict_order_cmp(&Value::Int(1), &Value::Int(1)),
        Some(Ordering::Equal)
    );
}

#[test]
fn float_equality_uses_total_order_bits() {
    assert_eq!(Value::Float(1.5), Value::Float(1.5));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn option_conversion_maps_none_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(4i64)), Value::Int(4));
}

#[test]
fn values_round_trip_through_serde() {
    let row = vec![
        Value::Null,
        Value::Bool(true),
        Value::Int(-7),
        Value::Uint(7),
        Value::Float(1.25),
        Value::Text("abc".into()),
    ];

    let json = serde_json::to_string(&row).expect("row must serialize");
    let decoded: Vec<Value> = serde_json::from_str(&json).expect("row must deserialize");
    assert_eq!(decoded, row);
}
