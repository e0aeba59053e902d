//! Yahoo chart adapter.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode, Url};

use super::api_types::ChartEnvelope;
use super::config::YahooConfig;
use super::error::YahooError;
use crate::application::ports::{HistoricalBarsRequest, HistoricalDataPort, MarketDataError};
use crate::domain::market_data::ProviderFrame;

/// Name shown in status messages.
const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo chart API adapter.
#[derive(Debug, Clone)]
pub struct YahooMarketDataAdapter {
    client: Client,
    base_url: Url,
}

impl YahooMarketDataAdapter {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &YahooConfig) -> Result<Self, YahooError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| YahooError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(YahooError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| YahooError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Build the chart URL for `request`.
    ///
    /// The range is `[start 00:00 UTC, end 00:00 UTC)`.
    pub(crate) fn chart_url(&self, request: &HistoricalBarsRequest) -> Result<Url, YahooError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| YahooError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", request.symbol.as_str()]);
        url.query_pairs_mut()
            .append_pair("period1", &epoch_midnight(request.start).to_string())
            .append_pair("period2", &epoch_midnight(request.end).to_string())
            .append_pair("interval", request.granularity.code())
            .append_pair("includePrePost", "false")
            .append_pair("events", "div,splits")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }

    async fn fetch_chart(&self, request: &HistoricalBarsRequest) -> Result<ProviderFrame, YahooError> {
        let url = self.chart_url(request)?;
        tracing::debug!(url = %url, "Requesting chart");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| YahooError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| YahooError::Network(e.to_string()))?;

        let symbol = request.symbol.to_string();
        match status {
            StatusCode::NOT_FOUND => return Err(YahooError::NotFound { symbol }),
            StatusCode::TOO_MANY_REQUESTS => return Err(YahooError::RateLimited),
            s if !s.is_success() => {
                // Error bodies usually carry the chart envelope; fall back to the raw text.
                let message = serde_json::from_str::<ChartEnvelope>(&body)
                    .ok()
                    .and_then(|envelope| envelope.chart.error)
                    .map_or_else(|| truncate(&body, 200), |error| error.description);
                return Err(YahooError::Api {
                    code: s.as_u16().to_string(),
                    message,
                });
            }
            _ => {}
        }

        let envelope: ChartEnvelope =
            serde_json::from_str(&body).map_err(|e| YahooError::JsonParse(e.to_string()))?;

        if let Some(error) = envelope.chart.error {
            if error.is_not_found() {
                return Err(YahooError::NotFound { symbol });
            }
            return Err(YahooError::Api {
                code: error.code,
                message: error.description,
            });
        }

        let result = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or(YahooError::EmptyResult { symbol })?;

        Ok(result.into_frame(request.symbol.clone(), request.granularity))
    }
}

#[async_trait]
impl HistoricalDataPort for YahooMarketDataAdapter {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(
        &self,
        request: &HistoricalBarsRequest,
    ) -> Result<ProviderFrame, MarketDataError> {
        Ok(self.fetch_chart(request).await?)
    }
}

fn epoch_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::BarGranularity;
    use crate::domain::shared::Symbol;

    fn request(symbol: &str, granularity: BarGranularity) -> HistoricalBarsRequest {
        HistoricalBarsRequest {
            symbol: Symbol::new(symbol),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            granularity,
        }
    }

    #[test]
    fn chart_url_has_range_and_interval() {
        let adapter = YahooMarketDataAdapter::new(&YahooConfig::default()).unwrap();
        let url = adapter
            .chart_url(&request("AAPL", BarGranularity::OneDay))
            .unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/AAPL");
        let query = url.query().unwrap();
        assert!(query.contains("period1=1672531200"));
        assert!(query.contains("period2=1673308800"));
        assert!(query.contains("interval=1d"));
        assert!(query.contains("includeAdjustedClose=true"));
    }

    #[test]
    fn chart_url_keeps_symbol_in_one_segment() {
        let adapter = YahooMarketDataAdapter::new(&YahooConfig::default()).unwrap();
        let url = adapter
            .chart_url(&request("EURUSD=X", BarGranularity::FiveMinutes))
            .unwrap();
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments, vec!["v8", "finance", "chart", "EURUSD=X"]);
        assert!(url.query().unwrap().contains("interval=5m"));
    }

    #[test]
    fn chart_url_respects_base_path() {
        let config = YahooConfig::default().with_base_url("http://localhost:9000/proxy/");
        let adapter = YahooMarketDataAdapter::new(&config).unwrap();
        let url = adapter
            .chart_url(&request("AAPL", BarGranularity::OneDay))
            .unwrap();
        assert_eq!(url.path(), "/proxy/v8/finance/chart/AAPL");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = YahooConfig::default().with_base_url("not a url");
        assert!(matches!(
            YahooMarketDataAdapter::new(&config),
            Err(YahooError::InvalidUrl(_))
        ));
    }

    #[test]
    fn provider_name_is_stable() {
        let adapter = YahooMarketDataAdapter::new(&YahooConfig::default()).unwrap();
        assert_eq!(adapter.provider_name(), "Yahoo Finance");
    }
}
