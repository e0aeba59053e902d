//! Observability module for metrics and logging.

mod logging;
mod metrics;

pub use logging::{LoggingError, default_directive, init_logging};
pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_bars_downloaded, record_cache_lookup,
    record_cache_store_failure, record_provider_fetch, record_render,
};
