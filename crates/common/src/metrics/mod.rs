//! Metrics for the service layer
//!
//! Counters and histograms for every backend call, keyed by resource,
//! method, and status.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all StaffDesk metrics
pub const METRICS_PREFIX: &str = "staffdesk";

const API_REQUESTS_TOTAL: &str = "staffdesk_api_requests_total";
const API_ERRORS_TOTAL: &str = "staffdesk_api_errors_total";
const API_REQUEST_DURATION: &str = "staffdesk_api_request_duration_seconds";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        API_REQUESTS_TOTAL,
        Unit::Count,
        "Total number of backend API requests"
    );

    describe_counter!(
        API_ERRORS_TOTAL,
        Unit::Count,
        "Backend API requests that failed or returned an error status"
    );

    describe_histogram!(
        API_REQUEST_DURATION,
        Unit::Seconds,
        "Backend API request latency in seconds"
    );

    tracing::info!(prefix = METRICS_PREFIX, "Metrics registered");
}

/// Helper to record one backend call
pub struct RequestMetrics {
    start: Instant,
    resource: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, resource: &str) -> Self {
        Self {
            start: Instant::now(),
            resource: resource.to_string(),
            method: method.to_string(),
        }
    }

    /// Record a completed request; `status` is `None` when no response arrived
    pub fn finish(self, status: Option<u16>) {
        let duration = self.start.elapsed().as_secs_f64();
        let status_label = status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string());

        counter!(
            API_REQUESTS_TOTAL,
            "method" => self.method.clone(),
            "resource" => self.resource.clone(),
            "status" => status_label
        )
        .increment(1);

        if !matches!(status, Some(s) if (200..300).contains(&s)) {
            counter!(
                API_ERRORS_TOTAL,
                "method" => self.method.clone(),
                "resource" => self.resource.clone()
            )
            .increment(1);
        }

        histogram!(
            API_REQUEST_DURATION,
            "method" => self.method,
            "resource" => self.resource
        )
        .record(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metrics() {
        register_metrics();
        let metrics = RequestMetrics::start("GET", "clients");
        metrics.finish(Some(200));
        RequestMetrics::start("POST", "client-contacts").finish(None);
        // No recorder installed: just verify it runs without panic
    }
}
