//! Historical Data Port (Driven Port)
//!
//! Interface for downloading historical OHLCV bars from an external
//! provider. The provider answers with a raw [`ProviderFrame`]; normalization
//! happens in the application layer.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::market_data::{BarGranularity, ProviderFrame};
use crate::domain::shared::Symbol;

/// Parameters of one provider download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalBarsRequest {
    /// Ticker.
    pub symbol: Symbol,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (exclusive).
    pub end: NaiveDate,
    /// Bar size.
    pub granularity: BarGranularity,
}

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Data unavailable.
    #[error("Market data unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited by market data provider")]
    RateLimited,

    /// API error.
    #[error("Market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },

    /// Response could not be decoded or normalized.
    #[error("Invalid market data response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

impl MarketDataError {
    /// Short label for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionError { .. } => "connection",
            Self::SymbolNotFound { .. } => "symbol_not_found",
            Self::DataUnavailable { .. } => "unavailable",
            Self::RateLimited => "rate_limited",
            Self::ApiError { .. } => "api",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }
}

/// Port for downloading historical bars.
///
/// This is a driven (secondary/outbound) port. The infrastructure layer
/// provides implementations (e.g., the Yahoo chart adapter).
#[async_trait]
pub trait HistoricalDataPort: Send + Sync {
    /// Provider name shown in status messages.
    fn provider_name(&self) -> &'static str;

    /// Download bars for one request.
    ///
    /// An unknown symbol is reported as [`MarketDataError::SymbolNotFound`];
    /// a valid symbol with no bars in range yields an empty frame.
    async fn fetch(&self, request: &HistoricalBarsRequest)
    -> Result<ProviderFrame, MarketDataError>;
}
