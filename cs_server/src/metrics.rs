//! Prometheus metrics for monitoring server health and activity.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener for
//! scraping. The exporter is optional; without `METRICS_BIND` the recorder
//! macros are no-ops.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))
}

/// Record HTTP request with method, path, and status labels.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment registration requests counter.
pub fn registrations_submitted_total() {
    metrics::counter!("registrations_submitted_total").increment(1);
}

/// Increment registration decisions counter, labeled by outcome.
pub fn registration_decisions_total(outcome: &'static str) {
    metrics::counter!("registration_decisions_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Increment scheduled matches counter.
pub fn matches_scheduled_total() {
    metrics::counter!("matches_scheduled_total").increment(1);
}
