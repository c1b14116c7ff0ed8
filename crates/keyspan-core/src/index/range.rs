//! Module: index::range
//! Responsibility: semantic-to-raw range lowering for index key traversal.
//! Does not own: bound-row validation or index-store scanning.
//! Boundary: bound evaluation calls this module to build raw envelopes.

use crate::{
    index::key::{RawIndexKey, encode_components, prefix_successor},
    value::{NullOrder, Value},
};
use std::ops::Bound;

///
/// RawRange
///
/// Canonical raw key-space envelope handed to an index cursor. Stored keys
/// carry an entry-discriminator suffix, so the lowered lower bound is always
/// inclusive of a prefix region and the upper bound always exclusive of one.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRange {
    pub lower: Bound<RawIndexKey>,
    pub upper: Bound<RawIndexKey>,
}

impl RawRange {
    /// The unrestricted envelope.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }
}

///
/// LoweredRange
///
/// Result of lowering one semantic component range: either a traversable raw
/// envelope or a statically-empty one that must never open a cursor.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoweredRange {
    Empty,
    Range(RawRange),
}

/// Lower semantic bound prefixes into a canonical raw envelope.
///
/// `lower` and `upper` are the concrete component prefixes of the bound rows
/// (components up to the first unbounded marker); an empty prefix leaves that
/// side of the envelope open. Inclusivity applies to the whole prefix group:
/// an inclusive upper bound of `(1,)` admits every composite key starting
/// with `1`.
#[must_use]
pub fn lower_component_range(
    lower: &[Value],
    lower_inclusive: bool,
    upper: &[Value],
    upper_inclusive: bool,
    null_order: NullOrder,
) -> LoweredRange {
    let raw_lower = if lower.is_empty() {
        Bound::Unbounded
    } else {
        let prefix = encode_components(lower, null_order);
        if lower_inclusive {
            Bound::Included(prefix)
        } else {
            // Strictly after the whole prefix group.
            match prefix_successor(prefix.as_bytes()) {
                Some(successor) => Bound::Included(RawIndexKey::from_bytes(successor)),
                None => return LoweredRange::Empty,
            }
        }
    };

    let raw_upper = if upper.is_empty() {
        Bound::Unbounded
    } else {
        let prefix = encode_components(upper, null_order);
        if upper_inclusive {
            // Admit the whole prefix group, then stop.
            match prefix_successor(prefix.as_bytes()) {
                Some(successor) => Bound::Excluded(RawIndexKey::from_bytes(successor)),
                None => Bound::Unbounded,
            }
        } else {
            Bound::Excluded(prefix)
        }
    };

    if envelope_is_empty(&raw_lower, &raw_upper) {
        return LoweredRange::Empty;
    }

    LoweredRange::Range(RawRange {
        lower: raw_lower,
        upper: raw_upper,
    })
}

/// Validate whether raw bounds encode an empty traversal envelope.
#[must_use]
pub fn envelope_is_empty(lower: &Bound<RawIndexKey>, upper: &Bound<RawIndexKey>) -> bool {
    // Unbounded envelopes are never empty by construction.
    let (Some(lower_key), Some(upper_key)) = (bound_key_ref(lower), bound_key_ref(upper)) else {
        return false;
    };

    if lower_key < upper_key {
        return false;
    }
    if lower_key > upper_key {
        return true;
    }

    !matches!(lower, Bound::Included(_)) || !matches!(upper, Bound::Included(_))
}

const fn bound_key_ref(bound: &Bound<RawIndexKey>) -> Option<&RawIndexKey> {
    match bound {
        Bound::Included(key) | Bound::Excluded(key) => Some(key),
        Bound::Unbounded => None,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{LoweredRange, envelope_is_empty, lower_component_range};
    use crate::{index::key::RawIndexKey, value::NullOrder, value::Value};
    use std::ops::Bound;

    fn raw_key(byte: u8) -> RawIndexKey {
        RawIndexKey::from_bytes(vec![byte])
    }

    #[test]
    fn envelope_emptiness_identifies_empty_equal_exclusive_bounds() {
        let lower = Bound::Included(raw_key(0x10));
        let upper = Bound::Excluded(raw_key(0x10));

        assert!(envelope_is_empty(&lower, &upper));
    }

    #[test]
    fn envelope_emptiness_identifies_inverted_bounds() {
        let lower = Bound::Included(raw_key(0x20));
        let upper = Bound::Excluded(raw_key(0x10));

        assert!(envelope_is_empty(&lower, &upper));
        assert!(!envelope_is_empty(&Bound::Unbounded, &upper));
    }

    #[test]
    fn equal_prefixes_with_inclusive_flags_form_a_probe_envelope() {
        let key = [Value::Int(2)];
        let lowered = lower_component_range(&key, true, &key, true, NullOrder::NullsFirst);

        let LoweredRange::Range(range) = lowered else {
            panic!("equality probe must lower to a traversable range");
        };

        // The envelope covers exactly the prefix group: inclusive start at
        // the prefix, exclusive end at its successor.
        let Bound::Included(start) = &range.lower else {
            panic!("lower must be inclusive");
        };
        let Bound::Excluded(end) = &range.upper else {
            panic!("upper must be exclusive of the successor");
        };
        assert!(start < end);
    }

    #[test]
    fn inverted_component_range_lowers_to_empty() {
        let lowered = lower_component_range(
            &[Value::Int(9)],
            true,
            &[Value::Int(2)],
            true,
            NullOrder::NullsFirst,
        );

        assert_eq!(lowered, LoweredRange::Empty);
    }

    #[test]
    fn exclusive_equal_prefixes_lower_to_empty() {
        let key = [Value::Int(2)];
        let lowered = lower_component_range(&key, false, &key, true, NullOrder::NullsFirst);

        assert_eq!(lowered, LoweredRange::Empty);
    }
}
