//! # Error Tests
//!
//! This module contains unit tests for the messages and conversions of
//! [`ConfigError`] and [`TraceError`].

use predsim_core::common::{ConfigError, TraceError};
use predsim_core::config::{BranchPredictorKind, PrefetcherKind};

#[test]
fn config_error_messages() {
    assert_eq!(
        ConfigError::ZeroEntries.to_string(),
        "branch predictor table must have at least one entry"
    );
    assert_eq!(
        ConfigError::ZeroAggression("stride").to_string(),
        "prefetcher `stride` requires an aggression of at least 1"
    );
    assert_eq!(
        ConfigError::ZeroInterval("checkpoint").to_string(),
        "`checkpoint` interval must be non-zero"
    );
    assert_eq!(
        ConfigError::TableTooLarge(1 << 40).to_string(),
        "table of 1099511627776 entries is too large to allocate"
    );
}

#[test]
fn unknown_variant_lists_accepted_names() {
    let err = "perceptron".parse::<BranchPredictorKind>().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("`perceptron`"));
    assert!(msg.contains(BranchPredictorKind::NAMES));

    let err = "stream".parse::<PrefetcherKind>().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownVariant { kind: "prefetcher", .. }
    ));
}

#[test]
fn json_errors_convert_to_parse() {
    let err: ConfigError = serde_json::from_str::<u64>("nope").unwrap_err().into();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn trace_error_carries_line_number() {
    let err = TraceError::malformed(17, "missing pc");
    assert_eq!(err.to_string(), "line 17: missing pc");
}

#[test]
fn io_errors_convert_to_trace_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: TraceError = io.into();
    assert!(matches!(err, TraceError::Io(_)));
    assert!(err.to_string().starts_with("failed to read trace"));
}
