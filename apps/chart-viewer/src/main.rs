//! Chart Viewer Binary
//!
//! Serves the chart page over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin chart-viewer
//! ```
//!
//! # Environment Variables
//!
//! - `CHART_VIEWER_CONFIG`: Path to the YAML config (default: `config.yaml` if present)
//! - `RUST_LOG`: Overrides the configured log level

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chart_viewer::application::ports::{HistoricalDataPort, SystemClock};
use chart_viewer::application::services::SeriesCache;
use chart_viewer::application::use_cases::{
    CollectInputUseCase, GetDataUseCase, RenderChartUseCase,
};
use chart_viewer::config::{Config, DEFAULT_CONFIG_PATH, load_config};
use chart_viewer::infrastructure::http::{AppState, create_router};
use chart_viewer::infrastructure::marketdata::{YahooConfig, YahooMarketDataAdapter};
use chart_viewer::infrastructure::persistence::FileSeriesStore;
use chart_viewer::infrastructure::render::SvgFigureEncoder;
use chart_viewer::observability::{MetricsConfig, init_logging, init_metrics};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable naming the config file.
const CONFIG_PATH_ENV: &str = "CHART_VIEWER_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = read_config()?;
    init_logging(&config.observability.logging).context("failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting chart viewer");
    log_config(&config);

    let metrics = if config.observability.metrics.enabled {
        Some(init_metrics(&MetricsConfig::default()).context("failed to install metrics")?)
    } else {
        None
    };

    let state = create_state(&config, metrics)?;
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /");
    tracing::info!("  GET  /chart.svg");
    tracing::info!("  GET  /api/v1/series");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /metrics");

    let token = shutdown.clone();
    let server = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move { token.cancelled().await })
        .into_future();

    tokio::select! {
        result = server => result.context("HTTP server error")?,
        () = async {
            shutdown.cancelled().await;
            tokio::time::sleep(SHUTDOWN_TIMEOUT).await;
        } => {
            tracing::warn!(
                timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                "Graceful shutdown timed out, dropping open connections"
            );
        }
    }

    tracing::info!("Chart viewer stopped");
    Ok(())
}

/// Load the config file, falling back to defaults when none exists.
fn read_config() -> anyhow::Result<Config> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config(Some(&path)).with_context(|| format!("failed to load {path}"));
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return load_config(None).context("failed to load config.yaml");
    }
    chart_viewer::config::load_config_from_string("").context("invalid default configuration")
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        listen = %config.server.listen_addr(),
        provider = %config.provider.base_url,
        cache_persist = config.cache.persist,
        cache_directory = %config.cache.directory,
        default_symbol = %config.defaults.symbol,
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );
}

/// Wire adapters into use cases.
fn create_state(
    config: &Config,
    metrics: Option<PrometheusHandle>,
) -> anyhow::Result<AppState<YahooMarketDataAdapter, SystemClock, SvgFigureEncoder>> {
    let provider = Arc::new(
        YahooMarketDataAdapter::new(&YahooConfig::from(&config.provider))
            .context("failed to create market data adapter")?,
    );

    let cache = if config.cache.persist {
        tracing::info!(directory = %config.cache.directory, "Series cache persisted to disk");
        SeriesCache::with_store(Arc::new(FileSeriesStore::new(&config.cache.directory)))
    } else {
        SeriesCache::new()
    };

    let collect_input = Arc::new(CollectInputUseCase::new(
        Arc::new(SystemClock),
        config.defaults.symbol.as_str(),
    ));
    let provider_name = provider.provider_name();
    let get_data = Arc::new(GetDataUseCase::new(provider, Arc::new(cache)));
    let render_chart = Arc::new(RenderChartUseCase::new(Arc::new(SvgFigureEncoder::new())));

    Ok(AppState {
        collect_input,
        get_data,
        render_chart,
        provider_name,
        metrics,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Wait for SIGTERM or Ctrl+C and cancel `token`.
#[allow(clippy::expect_used)]
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    token.cancel();
    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
