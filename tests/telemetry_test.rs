//! Telemetry module tests for collector dispatch.

use collector_dispatch::telemetry::{
    record_dispatch, record_version_fallback, DispatchSpan, LogConfig, LogError, LogFormat,
    SpanExt, DISPATCH_TOTAL, UNKNOWN_LABEL, VERSION_FALLBACK_TOTAL,
};
use std::path::PathBuf;
use tracing::Span;

// =============================================================================
// LogConfig Tests
// =============================================================================

#[test]
fn log_config_default_is_json_warn() {
    let config = LogConfig::default();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, "warn");
    assert!(config.output_path.is_none());
}

#[test]
fn log_config_with_output_path() {
    let config = LogConfig {
        format: LogFormat::Pretty,
        level: "collector_dispatch=trace".to_string(),
        output_path: Some(PathBuf::from("/tmp/collector.log")),
    };
    assert_eq!(config.output_path, Some(PathBuf::from("/tmp/collector.log")));
}

#[test]
fn log_format_parse() {
    assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    assert!(matches!("xml".parse::<LogFormat>(), Err(LogError::UnknownFormat(_))));
}

// =============================================================================
// LogError Tests
// =============================================================================

#[test]
fn log_error_display() {
    let error = LogError::InvalidFilter("bad filter".to_string());
    assert!(error.to_string().contains("Invalid log filter"));
    assert!(error.to_string().contains("bad filter"));
    assert!(LogError::AlreadyInitialized.to_string().contains("already initialized"));
}

// =============================================================================
// Span Tests
// =============================================================================

#[test]
fn span_ext_record_result_on_disabled_span() {
    let span = Span::none();
    span.record_result(&Ok::<i32, &str>(42));
    span.record_result(&Err::<i32, &str>("unsupported version"));
}

#[test]
fn dispatch_span_creates_without_subscriber() {
    let span = DispatchSpan::new("vllm", "attn", "0.15.1", "run_attention");
    let _guard = span.enter();
    span.record("unit", "vllm/attn_v2");
    span.record_result(&Ok::<(), String>(()));
}

// =============================================================================
// Metrics Tests
// =============================================================================

#[test]
fn metric_names_are_prefixed() {
    assert!(DISPATCH_TOTAL.starts_with("collector_"));
    assert!(VERSION_FALLBACK_TOTAL.starts_with("collector_"));
    assert_eq!(UNKNOWN_LABEL, "unknown");
}

#[test]
fn counters_without_recorder_are_noops() {
    record_dispatch("vllm", "attn", "ok");
    record_dispatch("trtllm", "moe", "unsupported_version");
    record_version_fallback("sglang", "attn");
}
