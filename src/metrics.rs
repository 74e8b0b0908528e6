//! Prometheus metrics for record operations.
//!
//! Counters are recorded through the `metrics` facade and are no-ops until
//! the binary installs a recorder with [`install_recorder`].

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Count one record operation and how it ended.
pub fn record_operation(op: &'static str, outcome: &'static str) {
    counter!(
        "scoreboard_record_operations_total",
        "op" => op,
        "outcome" => outcome
    )
    .increment(1);
}

/// Count entries dropped from a listing.
pub fn record_listing_skipped(count: usize) {
    counter!("scoreboard_listing_skipped_total").increment(count as u64);
}

/// Install the process-wide Prometheus recorder.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
