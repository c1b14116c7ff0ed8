use thiserror::Error as ThisError;

///
/// PredicateFailure
///
/// Opaque failure raised by a caller-supplied residual predicate. Surfaced
/// verbatim through [`ScanError::PredicateEvaluationFailure`], never
/// swallowed or downgraded.
///

pub type PredicateFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

///
/// ScanError
///
/// Structured scan-execution error with a stable internal classification.
/// No variant is ever converted into "scan everything": an unsatisfiable or
/// malformed bound yields zero rows or an error, never a full traversal.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum ScanError {
    /// Cooperative stop requested through the execution context. Causes an
    /// orderly close, not a defect.
    #[error("scan cancelled by caller")]
    Cancelled,

    /// The execution context deadline elapsed mid-scan.
    #[error("scan deadline exceeded")]
    DeadlineExceeded,

    /// The underlying index is gone or not ready (e.g. concurrent drop).
    /// Retry policy belongs to the query-execution layer above this core.
    #[error("index '{index}' is unavailable")]
    IndexUnavailable { index: String },

    /// Malformed bound row: a local programming error, surfaced immediately.
    #[error("invalid bound: {reason}")]
    InvalidBoundKind { reason: String },

    /// A caller-supplied residual predicate failed.
    #[error("residual predicate evaluation failed")]
    PredicateEvaluationFailure {
        #[source]
        source: PredicateFailure,
    },
}

impl ScanError {
    /// Construct an invalid-bound error.
    pub(crate) fn invalid_bound(reason: impl Into<String>) -> Self {
        Self::InvalidBoundKind {
            reason: reason.into(),
        }
    }

    /// Construct an index-unavailable error.
    pub(crate) fn index_unavailable(index: impl Into<String>) -> Self {
        Self::IndexUnavailable {
            index: index.into(),
        }
    }

    /// Wrap a caller predicate failure.
    pub(crate) fn predicate_failure(source: PredicateFailure) -> Self {
        Self::PredicateEvaluationFailure { source }
    }

    /// Stable classification of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled | Self::DeadlineExceeded => ErrorClass::Cancelled,
            Self::IndexUnavailable { .. } => ErrorClass::Unavailable,
            Self::InvalidBoundKind { .. } => ErrorClass::InvalidInput,
            Self::PredicateEvaluationFailure { .. } => ErrorClass::External,
        }
    }

    /// True for cooperative stops (cancellation, deadline) that end a scan
    /// without indicating a defect.
    #[must_use]
    pub const fn is_cooperative_stop(&self) -> bool {
        matches!(self.class(), ErrorClass::Cancelled)
    }
}

///
/// ErrorClass
///
/// Coarse classification consumed by callers deciding whether to retry,
/// surface, or absorb a failure.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Cooperative stop (cancellation or timeout).
    Cancelled,
    /// Failure propagated from caller-supplied code.
    External,
    /// Local programming error in the request shape.
    InvalidInput,
    /// A consumed collaborator is not currently usable.
    Unavailable,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{ErrorClass, ScanError};

    #[test]
    fn classification_is_stable() {
        assert_eq!(ScanError::Cancelled.class(), ErrorClass::Cancelled);
        assert_eq!(ScanError::DeadlineExceeded.class(), ErrorClass::Cancelled);
        assert_eq!(
            ScanError::index_unavailable("t_idx").class(),
            ErrorClass::Unavailable
        );
        assert_eq!(
            ScanError::invalid_bound("length mismatch").class(),
            ErrorClass::InvalidInput
        );
    }

    #[test]
    fn cooperative_stops_are_not_defects() {
        assert!(ScanError::Cancelled.is_cooperative_stop());
        assert!(ScanError::DeadlineExceeded.is_cooperative_stop());
        assert!(!ScanError::invalid_bound("x").is_cooperative_stop());
    }
}
