//! Metric names and the upstream call instruments

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram};

pub const UPSTREAM_REQUEST_DURATION: &str = "roastcam.upstream.request.duration";
pub const UPSTREAM_REQUEST_COUNT: &str = "roastcam.upstream.request.count";

/// Instruments recorded around every call to the upstream provider
///
/// Backed by the global meter provider, which is a no-op until telemetry
/// export is configured.
#[derive(Clone)]
pub struct UpstreamMetrics {
    count: Counter<u64>,
    duration: Histogram<f64>,
}

impl UpstreamMetrics {
    pub fn new() -> Self {
        let meter = opentelemetry::global::meter("roastcam");

        Self {
            count: meter
                .u64_counter(UPSTREAM_REQUEST_COUNT)
                .with_description("Requests sent to the upstream provider")
                .build(),
            duration: meter
                .f64_histogram(UPSTREAM_REQUEST_DURATION)
                .with_description("Upstream round trip time")
                .with_unit("s")
                .build(),
        }
    }

    /// Record one finished upstream call
    pub fn record(&self, operation: &'static str, outcome: &'static str, start: Instant) {
        let attributes = [
            KeyValue::new("operation", operation),
            KeyValue::new("outcome", outcome),
        ];
        self.count.add(1, &attributes);
        self.duration.record(start.elapsed().as_secs_f64(), &attributes);
    }
}

impl Default for UpstreamMetrics {
    fn default() -> Self {
        Self::new()
    }
}
