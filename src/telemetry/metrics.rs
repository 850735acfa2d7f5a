//! Dispatch counters via the `metrics` facade.
//!
//! No recorder is installed by this crate; without one these are no-ops.

use metrics::counter;

pub const DISPATCH_TOTAL: &str = "collector_dispatch_total";
pub const VERSION_FALLBACK_TOTAL: &str = "collector_version_fallback_total";

/// Label value for namespaces and operations that are not registered.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Count one dispatch by outcome ("ok" or a `DispatchError::kind`).
pub fn record_dispatch(namespace: &str, operation: &str, outcome: &'static str) {
    counter!(
        DISPATCH_TOTAL,
        "namespace" => namespace.to_string(),
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count a lenient fallback for an unlisted version.
pub fn record_version_fallback(namespace: &str, operation: &str) {
    counter!(
        VERSION_FALLBACK_TOTAL,
        "namespace" => namespace.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}
