//! Request-level error handling for the chart viewer.
//!
//! Layer errors (`MarketDataError`, `RenderError`, `DomainError`,
//! `ChartOptionsError`) convert into [`AppError`], which carries an
//! [`ErrorCode`] and renders as a JSON body with the matching HTTP status.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_REQUEST` | 400 | Malformed symbol, window or option |
//! | `SYMBOL_NOT_FOUND` | 404 | Provider does not know the ticker |
//! | `EMPTY_SERIES` | 422 | Query returned no bars to chart |
//! | `RATE_LIMITED` | 429 | Provider throttled the download |
//! | `PROVIDER_UNAVAILABLE` | 502 | Network or provider failure |
//! | `INTERNAL_ERROR` | 500 | Unexpected failure |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::MarketDataError;
use crate::domain::charting::{ChartOptionsError, RenderError};
use crate::domain::shared::DomainError;

/// Error codes surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid form values.
    InvalidRequest,
    /// Unknown ticker.
    SymbolNotFound,
    /// Nothing to chart.
    EmptySeries,
    /// Provider throttling.
    RateLimited,
    /// Network or provider failure.
    ProviderUnavailable,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::SymbolNotFound => StatusCode::NOT_FOUND,
            Self::EmptySeries => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ProviderUnavailable => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire name of the code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::SymbolNotFound => "SYMBOL_NOT_FOUND",
            Self::EmptySeries => "EMPTY_SERIES",
            Self::RateLimited => "RATE_LIMITED",
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A request failure with its code and message.
#[derive(Debug, Error)]
#[error("[{}] {message}", .code.reason())]
pub struct AppError {
    code: ErrorCode,
    message: String,
}

impl AppError {
    /// Create a new error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid request.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Body sent to HTTP clients.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self.to_http_response())).into_response()
    }
}

impl From<MarketDataError> for AppError {
    fn from(err: MarketDataError) -> Self {
        let code = match &err {
            MarketDataError::SymbolNotFound { .. } => ErrorCode::SymbolNotFound,
            MarketDataError::RateLimited => ErrorCode::RateLimited,
            MarketDataError::ConnectionError { .. }
            | MarketDataError::DataUnavailable { .. }
            | MarketDataError::ApiError { .. }
            | MarketDataError::InvalidResponse { .. } => ErrorCode::ProviderUnavailable,
        };
        Self::new(code, err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        let code = match &err {
            RenderError::EmptySeries { .. } => ErrorCode::EmptySeries,
            RenderError::Encoding(_) => ErrorCode::InternalError,
        };
        Self::new(code, err.to_string())
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::invalid_request(err.to_string())
    }
}

impl From<ChartOptionsError> for AppError {
    fn from(err: ChartOptionsError) -> Self {
        Self::invalid_request(err.to_string())
    }
}
