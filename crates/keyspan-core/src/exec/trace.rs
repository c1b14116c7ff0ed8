//! Scan tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect scan
//! semantics.

use crate::{colocation::ColocationGroup, error::ErrorClass, model::IndexModel};
use sha2::{Digest, Sha256};
use std::sync::Arc;

///
/// ScanFingerprint
///
/// Stable, deterministic fingerprint for one scan shape. Two invocations of
/// the same request over the same index produce the same fingerprint, so
/// trace consumers can correlate repeated executions.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ScanFingerprint([u8; 32]);

impl ScanFingerprint {
    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl std::fmt::Display for ScanFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

///
/// TracePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TracePhase {
    Bounds,
    CursorOpen,
    Filter,
    Transform,
}

///
/// ScanTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanTraceEvent {
    Start {
        fingerprint: ScanFingerprint,
    },
    Phase {
        fingerprint: ScanFingerprint,
        phase: TracePhase,
        rows: u64,
    },
    Finish {
        fingerprint: ScanFingerprint,
        rows: u64,
    },
    Error {
        fingerprint: ScanFingerprint,
        class: ErrorClass,
    },
}

///
/// ScanTraceSink
///

pub trait ScanTraceSink: Send + Sync {
    fn on_event(&self, event: ScanTraceEvent);
}

///
/// TraceScope
///
/// Per-invocation trace handle. Created at scan open, finished exactly once
/// by the stream's close path.
///

pub(crate) struct TraceScope {
    sink: Arc<dyn ScanTraceSink>,
    fingerprint: ScanFingerprint,
}

impl TraceScope {
    pub(crate) fn start(sink: Arc<dyn ScanTraceSink>, fingerprint: ScanFingerprint) -> Self {
        sink.on_event(ScanTraceEvent::Start { fingerprint });
        Self { sink, fingerprint }
    }

    pub(crate) fn phase(&self, phase: TracePhase, rows: u64) {
        self.sink.on_event(ScanTraceEvent::Phase {
            fingerprint: self.fingerprint,
            phase,
            rows,
        });
    }

    pub(crate) fn finish(&self, rows: u64) {
        self.sink.on_event(ScanTraceEvent::Finish {
            fingerprint: self.fingerprint,
            rows,
        });
    }

    pub(crate) fn error(&self, class: ErrorClass) {
        self.sink.on_event(ScanTraceEvent::Error {
            fingerprint: self.fingerprint,
            class,
        });
    }
}

/// Compute the fingerprint of one scan shape.
#[must_use]
pub(crate) fn scan_fingerprint(
    model: &IndexModel,
    group: &ColocationGroup,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> ScanFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(b"scanfp:v1");
    write_str(&mut hasher, &model.table);
    write_str(&mut hasher, &model.name);
    write_str(&mut hasher, group.shape_label());
    hasher.update([u8::from(lower_inclusive), u8::from(upper_inclusive)]);

    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    ScanFingerprint(out)
}

fn write_str(hasher: &mut Sha256, value: &str) {
    let len = u32::try_from(value.len()).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
    hasher.update(value.as_bytes());
}

///
/// TESTS
///
