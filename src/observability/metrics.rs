//! Metrics collection.
//!
//! # Metrics
//! - `http_client_requests_total` (counter): completed exchanges by method, status
//! - `http_client_request_duration_seconds` (histogram): latency by method
//! - `http_client_errors_total` (counter): failed calls by method, error kind
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Labels stay low-cardinality (no URLs)

use std::time::Instant;

/// Record a completed exchange.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "http_client_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "http_client_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a failed call.
pub fn record_error(method: &str, kind: &'static str) {
    metrics::counter!(
        "http_client_errors_total",
        "method" => method.to_string(),
        "kind" => kind
    )
    .increment(1);
}
