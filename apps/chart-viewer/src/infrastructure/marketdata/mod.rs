//! Market Data Adapters
//!
//! Implementations of `HistoricalDataPort`.

pub mod yahoo;

pub use yahoo::{YahooConfig, YahooError, YahooMarketDataAdapter};
