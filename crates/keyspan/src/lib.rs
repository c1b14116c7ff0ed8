//! ## Crate layout
//! - `core`: scan runtime — values, index contracts, bound evaluation,
//!   execution streams, the join driver, and observability.
//!
//! The `prelude` module mirrors the surface query-execution code actually
//! uses; depth-specific types stay one module level down in `core`.

pub use keyspan_core as core;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::core::{
        bound::{BoundSupplier, FixedBound},
        error::{ErrorClass, ScanError},
        exec::{CorrelatedEqBound, CorrelatedNestedLoopJoin, RowPredicate, RowTransform},
        index::{IndexRegistry, MemSortedIndex, SortedIndex},
    };
}
