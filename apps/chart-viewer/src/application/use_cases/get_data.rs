//! Get Data Use Case
//!
//! Returns the series for a query, downloading and normalizing it on a
//! cache miss. A given query reaches the provider at most once per cache
//! lifetime.

use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{HistoricalBarsRequest, HistoricalDataPort, MarketDataError};
use crate::application::services::{SeriesCache, SeriesSource};
use crate::domain::market_data::{Query, TimeSeries, normalize_frame};
use crate::observability::{record_bars_downloaded, record_provider_fetch};

/// Result of a data request.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The series.
    pub series: Arc<TimeSeries>,
    /// Tier that answered.
    pub source: SeriesSource,
    /// Progress messages, in order. Empty on a cache hit.
    pub status: Vec<String>,
}

impl FetchOutcome {
    /// Whether a fresh download completed during this request.
    #[must_use]
    pub const fn downloaded(&self) -> bool {
        matches!(self.source, SeriesSource::Provider)
    }
}

/// Use case for obtaining a series.
pub struct GetDataUseCase<P>
where
    P: HistoricalDataPort,
{
    provider: Arc<P>,
    cache: Arc<SeriesCache>,
}

impl<P> GetDataUseCase<P>
where
    P: HistoricalDataPort,
{
    /// Create a new `GetDataUseCase`.
    pub const fn new(provider: Arc<P>, cache: Arc<SeriesCache>) -> Self {
        Self { provider, cache }
    }

    /// Cache shared with this use case.
    #[must_use]
    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Get the series for `query`.
    ///
    /// # Errors
    ///
    /// Propagates provider failures; a response that cannot be normalized is
    /// reported as `InvalidResponse`. Nothing is cached on failure.
    pub async fn execute(&self, query: &Query) -> Result<FetchOutcome, MarketDataError> {
        let key = query.cache_key();
        if let Some((series, source)) = self.cache.lookup(&key).await {
            return Ok(FetchOutcome {
                series,
                source,
                status: Vec::new(),
            });
        }

        let provider = self.provider.provider_name();
        let request = HistoricalBarsRequest {
            symbol: query.symbol.clone(),
            start: query.start_date,
            end: query.end_date,
            granularity: query.interval_mode.granularity(),
        };

        let mut status = vec!["Downloading data...".to_string()];
        tracing::info!(
            provider,
            symbol = %request.symbol,
            start = %request.start,
            end = %request.end,
            interval = request.granularity.code(),
            "Downloading data"
        );

        let started = Instant::now();
        let frame = match self.provider.fetch(&request).await {
            Ok(frame) => frame,
            Err(e) => {
                record_provider_fetch(provider, e.kind(), started.elapsed().as_secs_f64());
                tracing::error!(provider, symbol = %request.symbol, error = %e, "Download failed");
                return Err(e);
            }
        };
        record_provider_fetch(provider, "ok", started.elapsed().as_secs_f64());

        let series = normalize_frame(&frame).map_err(|e| MarketDataError::InvalidResponse {
            message: e.to_string(),
        })?;

        status.push(format!("Data downloaded from {provider}"));
        status.push(format!(
            "Number of candles downloaded: {}",
            series.value_count()
        ));
        record_bars_downloaded(provider, series.len());
        tracing::info!(
            provider,
            symbol = %request.symbol,
            rows = series.len(),
            values = series.value_count(),
            "Data downloaded"
        );

        let series = self.cache.populate(key, series).await;
        Ok(FetchOutcome {
            series,
            source: SeriesSource::Provider,
            status,
        })
    }
}
