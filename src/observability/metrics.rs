//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watcher_cycles_total` (counter): completed poll cycles
//! - `watcher_files_extracted_total` (counter): files (re-)extracted
//! - `watcher_scan_errors_total` (counter): scan errors by kind
//! - `watcher_resolutions_total` (counter): lookups by outcome
//! - `watcher_reloads_total` (counter): reload attempts by outcome
//! - `watcher_tracked_entries` (gauge): backend entries in the last cycle
//!
//! Recording is a no-op until a recorder is installed, so the functions are
//! safe to call from tests and with metrics disabled.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_cycle() {
    metrics::counter!("watcher_cycles_total").increment(1);
}

pub fn record_file_extracted() {
    metrics::counter!("watcher_files_extracted_total").increment(1);
}

pub fn record_scan_error(kind: &'static str) {
    metrics::counter!("watcher_scan_errors_total", "kind" => kind).increment(1);
}

pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("watcher_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_reload(outcome: &'static str) {
    metrics::counter!("watcher_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_tracked_entries(count: usize) {
    metrics::gauge!("watcher_tracked_entries").set(count as f64);
}
