//! Yahoo-specific error types.

use thiserror::Error;

use crate::application::ports::MarketDataError;

/// Errors from the Yahoo adapter.
#[derive(Debug, Error, Clone)]
pub enum YahooError {
    /// Network or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The API does not know the symbol.
    #[error("Symbol not found: {symbol}")]
    NotFound {
        /// Requested symbol.
        symbol: String,
    },

    /// HTTP 429.
    #[error("Rate limited")]
    RateLimited,

    /// The API returned an error payload or an unexpected status.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code or HTTP status.
        code: String,
        /// Error description.
        message: String,
    },

    /// The body could not be decoded.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// The body decoded but carries no result.
    #[error("Empty response for {symbol}")]
    EmptyResult {
        /// Requested symbol.
        symbol: String,
    },

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<YahooError> for MarketDataError {
    fn from(err: YahooError) -> Self {
        match err {
            YahooError::Network(message) => Self::ConnectionError { message },
            YahooError::NotFound { symbol } => Self::SymbolNotFound { symbol },
            YahooError::RateLimited => Self::RateLimited,
            YahooError::Api { code, message } => Self::ApiError {
                message: format!("{code}: {message}"),
            },
            YahooError::JsonParse(message) => Self::InvalidResponse { message },
            YahooError::EmptyResult { symbol } => Self::DataUnavailable {
                message: format!("no chart result for {symbol}"),
            },
            YahooError::InvalidUrl(message) => Self::ApiError { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_maps_to_connection_error() {
        let err: MarketDataError = YahooError::Network("refused".to_string()).into();
        assert!(matches!(err, MarketDataError::ConnectionError { .. }));
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let err: MarketDataError = YahooError::NotFound {
            symbol: "ZZZZ".to_string(),
        }
        .into();
        assert!(matches!(err, MarketDataError::SymbolNotFound { symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn rate_limited_maps_through() {
        let err: MarketDataError = YahooError::RateLimited.into();
        assert!(matches!(err, MarketDataError::RateLimited));
    }

    #[test]
    fn json_maps_to_invalid_response() {
        let err: MarketDataError = YahooError::JsonParse("eof".to_string()).into();
        assert!(matches!(err, MarketDataError::InvalidResponse { .. }));
    }
}
