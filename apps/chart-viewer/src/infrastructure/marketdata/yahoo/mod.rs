//! Yahoo Finance Chart Adapter
//!
//! Implementation of `HistoricalDataPort` over the public chart API
//! (`/v8/finance/chart/{symbol}`):
//! - 5-minute bars for intraday queries, daily bars otherwise
//! - Adjusted close requested alongside OHLCV
//! - No retries; failures propagate to the caller

mod adapter;
mod api_types;
mod config;
mod error;

pub use adapter::YahooMarketDataAdapter;
pub use config::YahooConfig;
pub use error::YahooError;
