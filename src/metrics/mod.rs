//! Prometheus metrics for the playlist manager
//!
//! This module provides metrics tracking for:
//! - Reorder passes by outcome and their duration
//! - Relocations submitted to the provider
//! - Number of managed playlists
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_histogram, Counter,
    CounterVec, Encoder, Gauge, Histogram, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all manager metrics
struct ManagerMetrics {
    passes: CounterVec,
    relocations: Counter,
    pass_duration: Histogram,
    managed_playlists: Gauge,
}

/// Global storage for manager metrics
static MANAGER_METRICS: OnceLock<ManagerMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup.
/// If metric registration fails, subsequent metric operations become no-ops.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    // Prevent double initialization
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = ManagerMetrics {
        passes: register_counter_vec!(
            "fairplay_passes_total",
            "Total reorder passes by outcome",
            &["outcome"]
        )?,
        relocations: register_counter!(
            "fairplay_relocations_total",
            "Total relocations submitted to the provider"
        )?,
        pass_duration: register_histogram!(
            "fairplay_pass_duration_seconds",
            "Reorder pass duration in seconds",
            vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
        )?,
        managed_playlists: register_gauge!(
            "fairplay_managed_playlists",
            "Number of playlists currently managed"
        )?,
    };

    MANAGER_METRICS
        .set(metrics)
        .map_err(|_| "Manager metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    MANAGER_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record a finished pass
pub fn record_pass(outcome: &str, relocations: usize, duration_secs: f64) {
    let Some(m) = MANAGER_METRICS.get() else {
        return;
    };

    m.passes.with_label_values(&[outcome]).inc();
    m.pass_duration.observe(duration_secs);

    if relocations > 0 {
        m.relocations.inc_by(relocations as f64);
    }
}

/// Update the managed playlist gauge
pub fn set_managed_playlists(count: usize) {
    if let Some(m) = MANAGER_METRICS.get() {
        m.managed_playlists.set(count as f64);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_metrics_initialized() {
        let _ = init_metrics();
    }

    #[test]
    fn test_init_metrics() {
        let result = init_metrics();
        assert!(result.is_ok());

        // Second call should also be Ok (idempotent)
        let result2 = init_metrics();
        assert!(result2.is_ok());
    }

    #[test]
    fn test_encode_metrics() {
        ensure_metrics_initialized();
        record_pass("completed", 2, 0.02);
        let text = encode_metrics().unwrap();
        assert!(text.contains("fairplay_") || text.is_empty());
    }

    #[test]
    fn test_metrics_noop_without_init() {
        record_pass("skipped", 0, 0.001);
        set_managed_playlists(3);
    }
}
