//! Yahoo chart API response types.
//!
//! These types map directly to the `/v8/finance/chart` JSON format. Every
//! array may be absent when the range holds no bars.

use serde::Deserialize;

use crate::domain::market_data::{BarGranularity, ProviderColumn, ProviderFrame};
use crate::domain::shared::Symbol;

/// Top-level envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    /// Chart payload.
    pub chart: ChartBody,
}

/// Result list or error.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartBody {
    /// One result per requested symbol.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Error payload.
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

/// Error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartApiError {
    /// Error code, e.g. "Not Found".
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

impl ChartApiError {
    /// Whether the error means the symbol does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("not found")
    }
}

/// Bars for one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Instrument metadata.
    pub meta: ChartMeta,
    /// Bar open times, epoch seconds.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// Value arrays.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Instrument metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Symbol as the API spells it.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    pub gmtoffset: i32,
    /// Exchange time zone, e.g. "America/New_York".
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
    /// Granularity actually served, e.g. "1d".
    #[serde(default)]
    pub data_granularity: Option<String>,
}

/// Value arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    /// OHLCV block (one element).
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    /// Adjusted close block (daily only).
    #[serde(default)]
    pub adjclose: Vec<AdjCloseBlock>,
}

/// OHLCV arrays; entries are null where the exchange had no trade.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteBlock {
    /// Opens.
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    /// Highs.
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    /// Lows.
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    /// Closes.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    /// Volumes.
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Adjusted close array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjCloseBlock {
    /// Adjusted closes.
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResult {
    /// Convert into a provider frame with the API's column names.
    #[must_use]
    pub fn into_frame(self, symbol: Symbol, granularity: BarGranularity) -> ProviderFrame {
        let rows = self.timestamp.len();
        let mut indicators = self.indicators;
        let quote = if indicators.quote.is_empty() {
            QuoteBlock::default()
        } else {
            indicators.quote.swap_remove(0)
        };

        // A missing array means "no values", not a malformed response.
        let fill = |values: Vec<Option<f64>>| {
            if values.is_empty() {
                vec![None; rows]
            } else {
                values
            }
        };

        let mut columns = vec![
            ProviderColumn::new("Open", fill(quote.open)),
            ProviderColumn::new("High", fill(quote.high)),
            ProviderColumn::new("Low", fill(quote.low)),
            ProviderColumn::new("Close", fill(quote.close)),
            ProviderColumn::new("Volume", fill(quote.volume)),
        ];
        if let Some(adj) = indicators.adjclose.into_iter().next()
            && !adj.adjclose.is_empty()
        {
            columns.push(ProviderColumn::new("Adj Close", adj.adjclose));
        }

        ProviderFrame {
            symbol,
            granularity,
            utc_offset_seconds: self.meta.gmtoffset,
            timestamps: self.timestamp,
            columns,
        }
    }
}
