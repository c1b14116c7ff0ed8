//! Core runtime for keyspan: index range-scan execution for a distributed
//! query engine — bound rows, colocation filtering, lazy cancellable scan
//! streams, residual predicates, and the correlated join driver.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod bound;
pub mod colocation;
pub mod context;
pub mod error;
pub mod exec;
pub mod index;
pub mod model;
pub mod obs;
pub mod value;

///
/// CONSTANTS
///

/// Maximum number of columns in one composite index key.
///
/// This limit keeps encoded keys within bounded sizes and caps the
/// validation work done per bound row.
pub const MAX_INDEX_FIELDS: usize = 4;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, cursors, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        bound::{BoundComponent, BoundRow},
        colocation::{ColocationGroup, PartitionId},
        context::ExecutionContext,
        exec::{JoinKind, ScanRequest, ScanStream},
        model::{IndexField, IndexModel},
        value::{Row, Value},
    };
}
