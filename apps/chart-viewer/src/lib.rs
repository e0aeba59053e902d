// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Chart Viewer - Historical Price Charts
//!
//! Downloads historical OHLCV bars from a market data provider, caches them
//! by query and renders them as candle, OHLC, line, renko or
//! point-and-figure charts with moving-average overlays and a volume panel.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure logic with no I/O
//!   - `market_data`: Query, intraday clamp, provider frame normalization, `TimeSeries`
//!   - `charting`: Chart options, styles, indicators, bricks/columns, figure layout
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `HistoricalDataPort`, `SeriesStorePort`, `ClockPort`, `FigureEncoderPort`
//!   - `services`: Two-tier `SeriesCache`
//!   - `use_cases`: `CollectInput`, `GetData`, `RenderChart`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `marketdata`: Yahoo Finance chart API
//!   - `persistence`: JSON files on disk
//!   - `render`: SVG encoder
//!   - `http`: Axum page and JSON endpoints

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration loading and validation.
pub mod config;

/// Request-level errors and their HTTP mapping.
pub mod error;

/// Logging and Prometheus metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::{
    CollectInputUseCase, GetDataUseCase, RenderChartUseCase, SeriesCache, SeriesSource,
};
pub use domain::charting::{ChartOptions, ChartStyle, ChartType, Figure, MovingAverageWindows};
pub use domain::market_data::{IntervalMode, Query, TimeSeries};
pub use error::{AppError, ErrorCode};
