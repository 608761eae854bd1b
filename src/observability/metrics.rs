//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_calls_total` (counter): gateway operations by operation, outcome
//! - `gateway_connected` (gauge): 1=connected, 0=disconnected
//!
//! # Design Decisions
//! - The CLI is short-lived, so metrics are rendered to a Prometheus text
//!   file (node_exporter textfile collector) instead of served over HTTP

use std::path::Path;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder as the global recorder.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Write the current exposition text to `path`.
pub fn write_metrics(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, handle.render())
}

/// Record the outcome of one gateway operation.
pub fn record_gateway_call(operation: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("gateway_calls_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// Record the current connection state.
pub fn record_connected(connected: bool) {
    metrics::gauge!("gateway_connected").set(if connected { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_are_labelled_by_outcome() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_gateway_call("mint_badge", true);
            record_gateway_call("mint_badge", false);
            record_gateway_call("mint_badge", false);
        });

        let rendered = handle.render();
        assert!(rendered.contains("gateway_calls_total"));
        assert!(rendered.contains(r#"outcome="failure""#));
        assert!(rendered.contains(r#"operation="mint_badge""#));
    }
}
