//! OHLCV time series.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::interval::BarGranularity;
use crate::domain::shared::{DomainError, Symbol};

/// Normalized column schema, in display order.
pub const COLUMNS: [&str; 6] = ["open", "high", "low", "close", "adj close", "volume"];

/// A single price bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time in the exchange's UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Close adjusted for splits and dividends.
    pub adj_close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Bar {
    /// Whether the bar closed at or above its open.
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }

    /// Values in [`COLUMNS`] order.
    #[must_use]
    pub const fn values(&self) -> [f64; 6] {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.adj_close,
            self.volume,
        ]
    }
}

/// Ordered bars for one symbol and granularity.
///
/// Timestamps are strictly increasing. Instances are immutable once built
/// and shared behind `Arc` by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesRecord")]
pub struct TimeSeries {
    symbol: Symbol,
    granularity: BarGranularity,
    bars: Vec<Bar>,
}

/// Unchecked serialized form; validated on the way in.
#[derive(Deserialize)]
struct TimeSeriesRecord {
    symbol: Symbol,
    granularity: BarGranularity,
    bars: Vec<Bar>,
}

impl TryFrom<TimeSeriesRecord> for TimeSeries {
    type Error = DomainError;

    fn try_from(record: TimeSeriesRecord) -> Result<Self, Self::Error> {
        Self::new(record.symbol, record.granularity, record.bars)
    }
}

impl TimeSeries {
    /// Build a series from bars already in timestamp order.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if timestamps are not strictly increasing.
    pub fn new(
        symbol: Symbol,
        granularity: BarGranularity,
        bars: Vec<Bar>,
    ) -> Result<Self, DomainError> {
        if let Some(pos) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DomainError::InvariantViolation {
                aggregate: "TimeSeries".to_string(),
                invariant: "timestamps strictly increasing".to_string(),
                state: format!(
                    "row {} ({}) <= row {} ({})",
                    pos + 1,
                    bars[pos + 1].timestamp,
                    pos,
                    bars[pos].timestamp
                ),
            });
        }

        Ok(Self {
            symbol,
            granularity,
            bars,
        })
    }

    /// Build a series from bars in any order.
    ///
    /// Bars are sorted by timestamp; for duplicate timestamps the bar that
    /// appeared last wins.
    #[must_use]
    pub fn from_unordered(symbol: Symbol, granularity: BarGranularity, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps arrival order among equal timestamps.
        bars.sort_by_key(|bar| bar.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol,
            granularity,
            bars: deduped,
        }
    }

    /// Ticker.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Bar size.
    #[must_use]
    pub const fn granularity(&self) -> BarGranularity {
        self.granularity
    }

    /// All bars.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of values (rows × columns).
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.bars.len() * COLUMNS.len()
    }

    /// Column names.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// First bar.
    #[must_use]
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Last bar.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close prices in order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Volumes in order.
    #[must_use]
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }
}


#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn bar_at(minutes: i64, close: f64) -> Bar {
        let offset = FixedOffset::east_opt(19_800).unwrap();
        let base = offset.with_ymd_and_hms(2024, 5, 6, 9, 15, 0).unwrap();
        Bar {
            timestamp: base + Duration::minutes(minutes),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 10.0,
        }
    }

    #[test]
    fn new_accepts_increasing_timestamps() {
        let series = TimeSeries::new(
            Symbol::new("X"),
            BarGranularity::FiveMinutes,
            vec![bar_at(0, 1.0), bar_at(5, 2.0), bar_at(10, 3.0)],
        )
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.value_count(), 18);
    }

    #[test]
    fn new_rejects_duplicate_timestamps() {
        let err = TimeSeries::new(
            Symbol::new("X"),
            BarGranularity::FiveMinutes,
            vec![bar_at(0, 1.0), bar_at(0, 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation { .. }));
    }

    #[test]
    fn new_rejects_decreasing_timestamps() {
        assert!(
            TimeSeries::new(
                Symbol::new("X"),
                BarGranularity::FiveMinutes,
                vec![bar_at(10, 1.0), bar_at(5, 2.0)],
            )
            .is_err()
        );
    }

    #[test]
    fn from_unordered_sorts_and_keeps_last_duplicate() {
        let series = TimeSeries::from_unordered(
            Symbol::new("X"),
            BarGranularity::FiveMinutes,
            vec![bar_at(10, 3.0), bar_at(0, 1.0), bar_at(5, 2.0), bar_at(10, 4.0)],
        );
        assert_eq!(series.closes(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn empty_series() {
        let series = TimeSeries::new(Symbol::new("X"), BarGranularity::OneDay, vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.first().is_none());
        assert_eq!(series.columns(), &COLUMNS);
    }

    #[test]
    fn serde_round_trip_revalidates() {
        let series = test_support::daily_series(&[10.0, 11.0]);
        let json = serde_json::to_string(&series).unwrap();
        let back: TimeSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);

        // Swap the two bars: deserialization must refuse the unordered payload.
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let bars = value["bars"].as_array_mut().unwrap();
        bars.swap(0, 1);
        assert!(serde_json::from_value::<TimeSeries>(value).is_err());
    }
}
