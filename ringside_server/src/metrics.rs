//! Prometheus metrics for the association server.
//!
//! Metrics are exported on a separate scrape listener when `METRICS_BIND` is
//! set. Without an installed recorder every call here is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ringside_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/bets", 201);
//! metrics::bets_settled_total(12);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Domain Metrics
// ============================================================================

/// Increment tournaments created counter.
pub fn tournaments_created_total(seeding: &str) {
    metrics::counter!("tournaments_created_total", "seeding" => seeding.to_string())
        .increment(1);
}

/// Increment bracket advances counter.
pub fn tournament_advances_total() {
    metrics::counter!("tournament_advances_total").increment(1);
}

/// Increment fight cards with declared results.
pub fn results_declared_total() {
    metrics::counter!("results_declared_total").increment(1);
}

/// Increment placed bets counter and record the stake.
pub fn bet_placed(amount: i64) {
    metrics::counter!("bets_placed_total").increment(1);
    metrics::histogram!("bet_amount_minor_units").record(amount as f64);
}

/// Add settled bets to the counter.
pub fn bets_settled_total(count: usize) {
    metrics::counter!("bets_settled_total").increment(count as u64);
}

/// Increment refused settlement attempts.
pub fn settlement_refused_total(reason: &str) {
    metrics::counter!("settlement_refused_total", "reason" => reason.to_string()).increment(1);
}
