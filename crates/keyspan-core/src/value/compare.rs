use crate::value::{NullOrder, Value};
use std::cmp::Ordering;

/// Total canonical comparator used by bound evaluation and the in-memory
/// index, under an explicit NULL collation policy.
///
/// Ordering rules:
/// 1. NULL placement per `null_order`
/// 2. Canonical variant rank
/// 3. Variant-specific comparison for same-ranked values
///
/// Mixed-variant comparisons are rank-only and must remain deterministic.
#[must_use]
pub fn canonical_cmp_with(null_order: NullOrder, left: &Value, right: &Value) -> Ordering {
    match (left.is_null(), right.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => {
            return match null_order {
                NullOrder::NullsFirst => Ordering::Less,
                NullOrder::NullsLast => Ordering::Greater,
            };
        }
        (false, true) => {
            return match null_order {
                NullOrder::NullsFirst => Ordering::Greater,
                NullOrder::NullsLast => Ordering::Less,
            };
        }
        (false, false) => {}
    }

    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Total canonical comparator with the default NULLS FIRST collation.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    canonical_cmp_with(NullOrder::NullsFirst, left, right)
}

/// Strict comparator for identical orderable variants.
///
/// Returns `None` for mismatched variants or NULL operands. SQL comparison
/// against NULL is UNKNOWN, never an ordering.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    strict_order_cmp(left, right).unwrap_or(Ordering::Equal)
}
