//! Metric names and recording helpers for provider calls.
//!
//! Recording goes through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use std::time::Duration;

pub const REQUESTS_TOTAL: &str = "garmin_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "garmin_request_duration_seconds";

/// Outcome label for a finished provider call.
pub fn outcome_label<T>(result: &Result<T, crate::GarminError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

pub fn record_request(operation: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS, "operation" => operation)
        .record(elapsed.as_secs_f64());
}
