//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`market_data`]: Queries, cache keys, provider frames and OHLCV series
//! - [`charting`]: Chart options, indicators and the figure model

pub mod charting;
pub mod market_data;
pub mod shared;
