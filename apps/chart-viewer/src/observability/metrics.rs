//! Prometheus metrics for the chart viewer.
//!
//! Covers the series cache, provider downloads and chart rendering. The
//! recorder is installed without an HTTP listener; the server renders the
//! returned [`PrometheusHandle`] at `GET /metrics`.
//!
//! # Example
//!
//! ```ignore
//! use chart_viewer::observability::{init_metrics, MetricsConfig};
//!
//! let handle = init_metrics(&MetricsConfig::default()).expect("metrics");
//! record_cache_lookup("memory", true);
//! println!("{}", handle.render());
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Configuration for the metrics recorder.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            // 5ms to 30s: provider downloads are slow, renders are fast.
            latency_buckets: vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ],
        }
    }
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure the recorder.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install the recorder.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns an error if the buckets are invalid or a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

// ============================================================================
// Cache Metrics
// ============================================================================

/// Record a series cache lookup.
///
/// # Arguments
///
/// * `tier` - Cache tier (`"memory"` or `"persistent"`)
/// * `hit` - Whether the tier held the key
pub fn record_cache_lookup(tier: &str, hit: bool) {
    counter!(
        "series_cache_lookups_total",
        "tier" => tier.to_string(),
        "outcome" => if hit { "hit" } else { "miss" }.to_string()
    )
    .increment(1);
}

/// Record a failed write to the persistent tier.
pub fn record_cache_store_failure() {
    counter!("series_cache_store_failures_total").increment(1);
}

// ============================================================================
// Provider Metrics
// ============================================================================

/// Record a provider download.
///
/// # Arguments
///
/// * `provider` - Provider name (e.g., "Yahoo Finance")
/// * `outcome` - `"ok"` or an error kind (e.g., `"symbol_not_found"`)
/// * `latency_seconds` - Request duration in seconds
pub fn record_provider_fetch(provider: &str, outcome: &str, latency_seconds: f64) {
    counter!(
        "provider_fetches_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        "provider_fetch_latency_seconds",
        "provider" => provider.to_string()
    )
    .record(latency_seconds);
}

/// Record the number of bars in a downloaded series.
pub fn record_bars_downloaded(provider: &str, bars: usize) {
    histogram!(
        "provider_bars_downloaded",
        "provider" => provider.to_string()
    )
    .record(bars as f64);
}

// ============================================================================
// Render Metrics
// ============================================================================

/// Record a chart render.
///
/// # Arguments
///
/// * `chart_type` - Chart type name (e.g., "candle", "renko")
/// * `success` - Whether a document was produced
/// * `latency_seconds` - Layout plus encoding time in seconds
pub fn record_render(chart_type: &str, success: bool, latency_seconds: f64) {
    counter!(
        "chart_renders_total",
        "chart_type" => chart_type.to_string(),
        "outcome" => if success { "ok" } else { "error" }.to_string()
    )
    .increment(1);

    histogram!(
        "chart_render_latency_seconds",
        "chart_type" => chart_type.to_string()
    )
    .record(latency_seconds);
}
