//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gor_frames_total` (counter): input lines by outcome
//!   (dispatched, malformed, unknown_kind)
//! - `gor_dispatch_duration_seconds` (histogram): handler chain latency by channel
//! - `gor_dispatch_handlers` (histogram): handlers invoked per event
//! - `gor_swept_registrations_total` (counter): expired one-shot handlers
//! - `gor_registry_retained` / `gor_registry_temporary` (gauge): registry size
//! - `gor_replay_checks_total` (counter): replay comparisons by result
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - The Prometheus exporter is optional and off by default

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::dispatch::RegistryStats;
use crate::frame::Channel;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_frame(outcome: &'static str) {
    metrics::counter!("gor_frames_total", "outcome" => outcome).increment(1);
}

pub fn record_dispatch(channel: Channel, handlers: usize, start: Instant) {
    metrics::histogram!("gor_dispatch_duration_seconds", "channel" => channel.as_str())
        .record(start.elapsed().as_secs_f64());
    metrics::histogram!("gor_dispatch_handlers", "channel" => channel.as_str())
        .record(handlers as f64);
}

pub fn record_swept(count: usize) {
    if count > 0 {
        metrics::counter!("gor_swept_registrations_total").increment(count as u64);
    }
}

pub fn record_registry_size(stats: &RegistryStats) {
    metrics::gauge!("gor_registry_retained").set(stats.retained as f64);
    metrics::gauge!("gor_registry_temporary").set(stats.temporary as f64);
}

pub fn record_replay_check(result: &'static str) {
    metrics::counter!("gor_replay_checks_total", "result" => result).increment(1);
}
