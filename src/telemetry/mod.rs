//! Telemetry: structured logging, dispatch spans and counters.

mod logging;
mod metrics;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::{
    record_dispatch, record_version_fallback, DISPATCH_TOTAL, UNKNOWN_LABEL, VERSION_FALLBACK_TOTAL,
};
pub use spans::{DispatchSpan, SpanExt};
