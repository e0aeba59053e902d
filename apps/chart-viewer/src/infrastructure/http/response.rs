//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

use crate::application::services::SeriesSource;
use crate::domain::market_data::{Bar, Notice, Query};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Response of `GET /api/v1/series`.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesResponse {
    /// Query after defaults and corrections.
    pub query: Query,
    /// Input corrections.
    pub notices: Vec<Notice>,
    /// Tier that answered.
    pub source: SeriesSource,
    /// Download progress messages; empty on a cache hit.
    pub status: Vec<String>,
    /// Column names of `rows`.
    pub columns: Vec<&'static str>,
    /// Bars, oldest first.
    pub rows: Vec<Bar>,
}
