//! Span factory for dispatch calls and result recording.

use tracing::{info_span, Span};

/// Extension trait for recording an operation's outcome on its span.
pub trait SpanExt {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for dispatch spans.
pub struct DispatchSpan;

impl DispatchSpan {
    /// `unit`, `status` and `error.message` start empty and are filled in
    /// as the call progresses.
    pub fn new(namespace: &str, operation: &str, version: &str, function: &str) -> Span {
        info_span!(
            "collector_dispatch",
            namespace = %namespace,
            operation = %operation,
            version = %version,
            function = %function,
            unit = tracing::field::Empty,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
