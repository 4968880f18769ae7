//! Gateway metrics collection.
//!
//! Provides standardized metrics for monitoring gateway operations:
//! - Request counters by operation and status
//! - Latency histograms
//! - Save fallback counters
//! - Change notification counters

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total HTTP requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "docgate_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "docgate_latency_seconds";

    /// Saves that fell back from update to create, by collection.
    pub const SAVE_FALLBACKS_TOTAL: &str = "docgate_save_fallbacks_total";

    /// Change notifications emitted, by collection and kind.
    pub const CHANGE_NOTIFICATIONS_TOTAL: &str = "docgate_change_notifications_total";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed request. `status` 0 means no response.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

pub fn record_save_fallback(collection: &str) {
    counter!(
        names::SAVE_FALLBACKS_TOTAL,
        "collection" => collection.to_string()
    )
    .increment(1);
}

pub fn record_notification(collection: &str, kind: &str) {
    counter!(
        names::CHANGE_NOTIFICATIONS_TOTAL,
        "collection" => collection.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

// =============================================================================
// Tests
// =============================================================================
