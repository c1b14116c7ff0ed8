pub(crate) mod compare;
pub(crate) mod tag;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::fmt;

// re-exports
pub use compare::{canonical_cmp, canonical_cmp_with, strict_order_cmp};
pub use tag::{ValueTag, canonical_rank, canonical_tag};

///
/// Row
///
/// One materialized tuple flowing through scan execution. Shape is defined by
/// the producing index (full table row, or a projected subset when a
/// required-column hint was honored).
///

pub type Row = Vec<Value>;

///
/// NullOrder
///
/// Index collation policy for NULL key components: whether NULL sorts before
/// or after every non-null value. One index uses exactly one policy; mixing
/// policies across scans of the same index is a caller error.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum NullOrder {
    #[default]
    NullsFirst,
    NullsLast,
}

///
/// Value
///
/// Scalar value vocabulary for key components and row fields. A deliberately
/// small subset of a full SQL type system: enough for composite integer,
/// text, and float keys plus three-valued NULL behavior.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stable canonical variant tag.
    #[must_use]
    pub const fn canonical_tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    /// Stable 0-based cross-variant rank.
    #[must_use]
    pub const fn canonical_rank(&self) -> u8 {
        tag::canonical_rank(self)
    }

    /// Stable value kind label for diagnostics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        self.canonical_tag().label()
    }
}

// Float equality uses total-order bits so `Value` can be `Eq` and rows can be
// compared exactly in executor and test paths. NaN payloads compare by bits.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
