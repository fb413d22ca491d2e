//! Prometheus metrics for converter registration and command execution.

use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Metrics registry holding every core metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        // Names are unique within this module, registration only fails on duplicates.
        let _ = registry.register(metric);
    }
    registry
});

// =============================================================================
// Registration Metrics
// =============================================================================

/// Converter registrations by result.
pub static REGISTRATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bioconvert_registrations_total",
            "Total converter registrations",
        ),
        &["result"], // "registered", "rejected"
    )
    .unwrap()
});

// =============================================================================
// Execution Metrics
// =============================================================================

/// Shell commands executed by result.
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bioconvert_commands_total", "Total shell commands executed"),
        &["result"], // "success", "failed", "ignored", "spawn_error", "io_error"
    )
    .unwrap()
});

/// Command duration in seconds.
pub static COMMAND_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bioconvert_command_duration_seconds",
            "Wall-clock duration of shell commands",
        )
        .buckets(vec![
            0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 1800.0,
        ]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(REGISTRATIONS_TOTAL.clone()),
        Box::new(COMMANDS_TOTAL.clone()),
        Box::new(COMMAND_DURATION.clone()),
    ]
}

/// Encode the core registry in the Prometheus text exposition format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
