//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define transaction lifecycle metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `custody_transactions_submitted_total` (counter): submissions by outcome
//! - `custody_poll_attempts_total` (counter): status queries issued while waiting
//! - `custody_wait_outcomes_total` (counter): waits by outcome (settled, timeout, cancelled, error)
//! - `custody_settle_duration_seconds` (histogram): time from wait start to settlement
//! - `custody_submitted_operations` (histogram): operations per submitted batch
//! - `custody_rpc_failures_total` (counter): chain RPC failures by provider index
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality; transaction ids never become labels

use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a submission attempt.
pub fn record_submission(outcome: &'static str, operations: usize) {
    metrics::counter!("custody_transactions_submitted_total", "outcome" => outcome).increment(1);
    metrics::histogram!("custody_submitted_operations").record(operations as f64);
}

/// Record one status query issued by a confirmation wait.
pub fn record_poll_attempt() {
    metrics::counter!("custody_poll_attempts_total").increment(1);
}

/// Record how a confirmation wait ended.
pub fn record_wait_outcome(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("custody_wait_outcomes_total", "outcome" => outcome).increment(1);
    if outcome == "settled" {
        metrics::histogram!("custody_settle_duration_seconds").record(elapsed.as_secs_f64());
    }
}

/// Record a chain RPC failure for a provider.
pub fn record_rpc_failure(provider_idx: usize) {
    metrics::counter!("custody_rpc_failures_total", "provider" => provider_idx.to_string())
        .increment(1);
}
