//! Market Data Bounded Context
//!
//! Queries, provider frames and the normalized OHLCV time series.

pub mod frame;
pub mod interval;
pub mod query;
pub mod series;

pub use frame::{NormalizeError, ProviderColumn, ProviderFrame, normalize_frame};
pub use interval::{
    BarGranularity, DAILY_DEFAULT_LOOKBACK_DAYS, INTRADAY_MAX_LOOKBACK_DAYS, IntervalMode,
};
pub use query::{
    CacheKey, DEFAULT_SYMBOL, Notice, NoticeLevel, Query, StartDateCorrection, clamp_start_date,
    default_start_date,
};
pub use series::{Bar, COLUMNS, TimeSeries};
