use crate::value::Value;

///
/// ValueTag
///
/// Stable canonical value-variant tag used by ordering, key encoding, and
/// fingerprint surfaces.
///
/// IMPORTANT:
/// Tag values participate in deterministic scan behavior and in the encoded
/// index key layout. They must remain fixed once persisted keys exist.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueTag {
    Null = 1,
    Bool = 2,
    Int = 3,
    Uint = 4,
    Float = 5,
    Text = 6,
}

impl ValueTag {
    /// Stable byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Uint => "Uint",
            Self::Float => "Float",
            Self::Text => "Text",
        }
    }
}

/// Canonical tag for one value.
#[must_use]
pub const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Null => ValueTag::Null,
        Value::Bool(_) => ValueTag::Bool,
        Value::Int(_) => ValueTag::Int,
        Value::Uint(_) => ValueTag::Uint,
        Value::Float(_) => ValueTag::Float,
        Value::Text(_) => ValueTag::Text,
    }
}

/// Canonical 0-based rank used for cross-variant ordering of non-null values.
///
/// NULL placement is a collation policy, not a rank; see
/// [`crate::value::compare::canonical_cmp_with`].
#[must_use]
pub const fn canonical_rank(value: &Value) -> u8 {
    canonical_tag(value).to_u8() - 1
}
