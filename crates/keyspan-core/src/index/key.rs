//! Module: index::key
//! Responsibility: order-preserving canonical encoding of index key tuples.
//! Does not own: bound lowering or cursor traversal.
//! Boundary: byte order of `RawIndexKey` must exactly match canonical value
//! order under the index's NULL collation.

use crate::value::{NullOrder, Value};

// Variant tag bytes. Gaps leave room for future variants without reordering.
// NULL has no fixed tag: its placement is the collation policy.
const NULL_FIRST_TAG: u8 = 0x00;
const BOOL_TAG: u8 = 0x10;
const INT_TAG: u8 = 0x20;
const UINT_TAG: u8 = 0x30;
const FLOAT_TAG: u8 = 0x40;
const TEXT_TAG: u8 = 0x50;
const NULL_LAST_TAG: u8 = 0xFF;

///
/// RawIndexKey
///
/// Canonical encoded index-key bytes. Lexicographic order of raw keys equals
/// canonical order of the decoded component tuples, which is what makes
/// BTree range traversal correct.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RawIndexKey(Vec<u8>);

impl RawIndexKey {
    #[must_use]
    pub(crate) const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Append an entry discriminator so non-unique index keys stay unique in
    /// the backing map. The suffix is order-neutral between distinct keys
    /// because component encodings are prefix-free.
    #[must_use]
    pub(crate) fn with_entry_suffix(mut self, entry_id: u64) -> Self {
        self.0.extend_from_slice(&entry_id.to_be_bytes());
        self
    }
}

///
/// IndexKey
///
/// Decoded component tuple for one index entry.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexKey {
    components: Vec<Value>,
}

impl IndexKey {
    #[must_use]
    pub const fn new(components: Vec<Value>) -> Self {
        Self { components }
    }

    #[must_use]
    pub fn components(&self) -> &[Value] {
        &self.components
    }

    #[must_use]
    pub fn component(&self, index: usize) -> Option<&Value> {
        self.components.get(index)
    }

    /// Encode this tuple into canonical raw bytes under the given collation.
    #[must_use]
    pub fn to_raw(&self, null_order: NullOrder) -> RawIndexKey {
        encode_components(&self.components, null_order)
    }
}

/// Encode an ordered component prefix into canonical raw bytes.
#[must_use]
pub(crate) fn encode_components(components: &[Value], null_order: NullOrder) -> RawIndexKey {
    let mut out = Vec::new();
    for component in components {
        encode_component(&mut out, component, null_order);
    }

    RawIndexKey(out)
}

/// Encode one component so lexicographic byte order matches
/// `canonical_cmp_with(null_order, ..)` for every value pair.
pub(crate) fn encode_component(out: &mut Vec<u8>, value: &Value, null_order: NullOrder) {
    match value {
        Value::Null => out.push(match null_order {
            NullOrder::NullsFirst => NULL_FIRST_TAG,
            NullOrder::NullsLast => NULL_LAST_TAG,
        }),
        Value::Bool(v) => {
            out.push(BOOL_TAG);
            out.push(u8::from(*v));
        }
        Value::Int(v) => {
            out.push(INT_TAG);
            out.extend_from_slice(&ordered_i64_bytes(*v));
        }
        Value::Uint(v) => {
            out.push(UINT_TAG);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Value::Float(v) => {
            out.push(FLOAT_TAG);
            out.extend_from_slice(&ordered_f64_bytes(*v));
        }
        Value::Text(v) => {
            out.push(TEXT_TAG);
            push_terminated_bytes(out, v.as_bytes());
        }
    }
}

/// Smallest byte string strictly greater than every string prefixed by
/// `bytes`. `None` when no such string exists (all bytes are 0xFF).
#[must_use]
pub(crate) fn prefix_successor(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = bytes.to_vec();
    while let Some(last) = out.pop() {
        if last < u8::MAX {
            out.push(last + 1);
            return Some(out);
        }
    }

    None
}

// Byte strings are escaped so tuple boundaries remain unambiguous: interior
// zero bytes become (0x00, 0xFF) and the component ends with (0x00, 0x00).
fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == 0 {
            out.extend_from_slice(&[0, 0xFF]);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&[0, 0]);
}

const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}

const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}
