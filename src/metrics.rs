//! Prometheus metrics for the decision cycle.
//!
//! This module provides metrics for:
//! - Decision cycle latency and outcomes
//! - Sweep samples skipped and quote failures
//! - Orders submitted and filled

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Decision cycle latency metric name.
pub const METRIC_CYCLE_LATENCY: &str = "cycle_latency_ms";
/// Decision cycles counter metric name.
pub const METRIC_CYCLES: &str = "cycles_total";
/// Aborted cycles counter metric name.
pub const METRIC_CYCLES_ABORTED: &str = "cycles_aborted_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";
/// Opportunities executed counter metric name.
pub const METRIC_OPPORTUNITIES_EXECUTED: &str = "opportunities_executed_total";
/// Skipped sweep samples counter metric name.
pub const METRIC_SAMPLES_SKIPPED: &str = "samples_skipped_total";
/// Quote provider failures counter metric name.
pub const METRIC_QUOTE_FAILURES: &str = "quote_failures_total";
/// Orders submitted counter metric name.
pub const METRIC_ORDERS_SUBMITTED: &str = "orders_submitted_total";
/// Orders filled counter metric name.
pub const METRIC_ORDERS_FILLED: &str = "orders_filled_total";
/// Orders rejected counter metric name.
pub const METRIC_ORDERS_FAILED: &str = "orders_failed_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_CYCLE_LATENCY,
        "Decision cycle latency in milliseconds"
    );

    describe_counter!(METRIC_CYCLES, "Total number of decision cycles run");
    describe_counter!(
        METRIC_CYCLES_ABORTED,
        "Total number of cycles aborted by a quote provider failure"
    );
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of profitable proposals found"
    );
    describe_counter!(
        METRIC_OPPORTUNITIES_EXECUTED,
        "Total number of proposals submitted for execution"
    );
    describe_counter!(
        METRIC_SAMPLES_SKIPPED,
        "Total number of sweep samples skipped because a venue could not fill them"
    );
    describe_counter!(
        METRIC_QUOTE_FAILURES,
        "Total number of quote provider connectivity failures"
    );
    describe_counter!(METRIC_ORDERS_SUBMITTED, "Total number of orders submitted");
    describe_counter!(METRIC_ORDERS_FILLED, "Total number of orders filled");
    describe_counter!(
        METRIC_ORDERS_FAILED,
        "Total number of order batches rejected by the executor"
    );

    debug!("Metrics initialized");
}

/// Increment cycles counter.
pub fn inc_cycles() {
    counter!(METRIC_CYCLES).increment(1);
}

/// Increment aborted cycles counter.
pub fn inc_cycles_aborted() {
    counter!(METRIC_CYCLES_ABORTED).increment(1);
}

/// Increment opportunities detected counter.
pub fn inc_opportunities_detected() {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(1);
}

/// Increment opportunities executed counter.
pub fn inc_opportunities_executed() {
    counter!(METRIC_OPPORTUNITIES_EXECUTED).increment(1);
}

/// Increment skipped samples counter.
pub fn inc_samples_skipped() {
    counter!(METRIC_SAMPLES_SKIPPED).increment(1);
}

/// Increment quote failures counter, labelled by venue.
pub fn inc_quote_failures(venue: &str) {
    counter!(METRIC_QUOTE_FAILURES, "venue" => venue.to_string()).increment(1);
}

/// Increment order submitted counter.
pub fn inc_orders_submitted() {
    counter!(METRIC_ORDERS_SUBMITTED).increment(1);
}

/// Increment orders filled counter.
pub fn inc_orders_filled() {
    counter!(METRIC_ORDERS_FILLED).increment(1);
}

/// Increment orders failed counter.
pub fn inc_orders_failed() {
    counter!(METRIC_ORDERS_FAILED).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a decision cycle.
pub fn timer_cycle() -> LatencyTimer {
    LatencyTimer::new(METRIC_CYCLE_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_a_noop() {
        inc_cycles();
        inc_quote_failures("binance");
        let timer = timer_cycle();
        drop(timer);
    }
}
