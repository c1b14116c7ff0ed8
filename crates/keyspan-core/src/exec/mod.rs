//! Module: exec
//! Responsibility: scan execution — bounds at open, lazy cursor pull,
//! residual filtering, output shaping, and the correlated join driver.
//! Does not own: index storage or bound vocabulary.

pub mod instrument;
pub mod join;
pub mod predicate;
pub mod scan;
pub mod trace;
pub mod transform;


// re-exports
pub use instrument::InstrumentedIndex;
pub use join::{CorrelatedEqBound, CorrelatedNestedLoopJoin, JoinKind, JoinStream};
pub use predicate::{CountingPredicate, PredicateChain, PredicateRef, RowPredicate};
pub use scan::{ScanRequest, ScanState, ScanStream};
pub use trace::{ScanFingerprint, ScanTraceEvent, ScanTraceSink, TracePhase};
pub use transform::{IdentityTransform, KeyTransform, RowTransform, TransformRef};
