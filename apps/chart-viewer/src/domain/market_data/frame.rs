//! Raw tabular data as returned by a market data provider.
//!
//! Columns keep the provider's names ("Open", "Adj Close", ...) and values
//! may be missing. [`normalize_frame`] turns a frame into a [`TimeSeries`].

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use super::interval::BarGranularity;
use super::series::{Bar, TimeSeries};
use crate::domain::shared::Symbol;

/// One provider column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderColumn {
    /// Column name as the provider spells it.
    pub name: String,
    /// One value per timestamp; `None` where the provider sent null.
    pub values: Vec<Option<f64>>,
}

impl ProviderColumn {
    /// Create a column.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A provider response before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFrame {
    /// Ticker the provider answered for.
    pub symbol: Symbol,
    /// Bar size the provider answered with.
    pub granularity: BarGranularity,
    /// Exchange offset from UTC in seconds.
    pub utc_offset_seconds: i32,
    /// Row index as Unix epoch seconds.
    pub timestamps: Vec<i64>,
    /// Value columns.
    pub columns: Vec<ProviderColumn>,
}

/// Field of the normalized schema a provider column maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Field {
    /// Map a provider column name onto the lower-case schema.
    fn from_provider_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            "close" => Some(Self::Close),
            "adj close" | "adjclose" | "adj_close" => Some(Self::AdjClose),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }

    const fn schema_name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::AdjClose => "adj close",
            Self::Volume => "volume",
        }
    }
}

/// Errors raised while normalizing a provider frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A required column is absent.
    #[error("provider response is missing the '{0}' column")]
    MissingColumn(&'static str),

    /// A column's length disagrees with the index.
    #[error("column '{column}' has {actual} values, index has {expected}")]
    LengthMismatch {
        /// Provider column name.
        column: String,
        /// Index length.
        expected: usize,
        /// Column length.
        actual: usize,
    },

    /// A timestamp or offset cannot be represented.
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(i64),
}

/// Normalize a provider frame into a [`TimeSeries`].
///
/// - Provider column names map to `open, high, low, close, adj close, volume`;
///   unknown columns are ignored.
/// - A missing adjusted-close column (intraday) is filled from close.
/// - Rows with any missing or non-finite open/high/low/close are dropped.
/// - Missing volume becomes `0.0`.
/// - Rows are sorted by timestamp and duplicate timestamps keep the last row.
pub fn normalize_frame(frame: &ProviderFrame) -> Result<TimeSeries, NormalizeError> {
    let expected = frame.timestamps.len();
    let offset = FixedOffset::east_opt(frame.utc_offset_seconds)
        .ok_or(NormalizeError::InvalidTimestamp(i64::from(frame.utc_offset_seconds)))?;

    let mut open = None;
    let mut high = None;
    let mut low = None;
    let mut close = None;
    let mut adj_close = None;
    let mut volume = None;

    for column in &frame.columns {
        let Some(field) = Field::from_provider_name(&column.name) else {
            continue;
        };
        if column.values.len() != expected {
            return Err(NormalizeError::LengthMismatch {
                column: column.name.clone(),
                expected,
                actual: column.values.len(),
            });
        }
        let slot = match field {
            Field::Open => &mut open,
            Field::High => &mut high,
            Field::Low => &mut low,
            Field::Close => &mut close,
            Field::AdjClose => &mut adj_close,
            Field::Volume => &mut volume,
        };
        *slot = Some(column.values.as_slice());
    }

    let open = open.ok_or(NormalizeError::MissingColumn(Field::Open.schema_name()))?;
    let high = high.ok_or(NormalizeError::MissingColumn(Field::High.schema_name()))?;
    let low = low.ok_or(NormalizeError::MissingColumn(Field::Low.schema_name()))?;
    let close = close.ok_or(NormalizeError::MissingColumn(Field::Close.schema_name()))?;

    let mut bars = Vec::with_capacity(expected);
    for (row, &epoch) in frame.timestamps.iter().enumerate() {
        let finite = |values: &[Option<f64>]| values[row].filter(|v| v.is_finite());
        let (Some(o), Some(h), Some(l), Some(c)) =
            (finite(open), finite(high), finite(low), finite(close))
        else {
            continue;
        };

        let timestamp = DateTime::from_timestamp(epoch, 0)
            .ok_or(NormalizeError::InvalidTimestamp(epoch))?
            .with_timezone(&offset);

        bars.push(Bar {
            timestamp,
            open: o,
            high: h,
            low: l,
            close: c,
            adj_close: adj_close.and_then(finite).unwrap_or(c),
            volume: volume.and_then(finite).unwrap_or(0.0),
        });
    }

    Ok(TimeSeries::from_unordered(
        frame.symbol.clone(),
        frame.granularity,
        bars,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<ProviderColumn>, timestamps: Vec<i64>) -> ProviderFrame {
        ProviderFrame {
            symbol: Symbol::new("AAPL"),
            granularity: BarGranularity::OneDay,
            utc_offset_seconds: -18_000,
            timestamps,
            columns,
        }
    }

    fn full_columns(n: usize) -> Vec<ProviderColumn> {
        let v = |base: f64| (0..n).map(|i| Some(base + i as f64)).collect::<Vec<_>>();
        vec![
            ProviderColumn::new("Open", v(10.0)),
            ProviderColumn::new("High", v(12.0)),
            ProviderColumn::new("Low", v(9.0)),
            ProviderColumn::new("Close", v(11.0)),
            ProviderColumn::new("Adj Close", v(10.5)),
            ProviderColumn::new("Volume", v(1000.0)),
        ]
    }

    #[test]
    fn maps_provider_columns_to_schema() {
        let series = normalize_frame(&frame(
            full_columns(2),
            vec![1_672_756_200, 1_672_842_600],
        ))
        .unwrap();
        assert_eq!(series.len(), 2);
        let first = series.first().unwrap();
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 12.0);
        assert_eq!(first.low, 9.0);
        assert_eq!(first.close, 11.0);
        assert_eq!(first.adj_close, 10.5);
        assert_eq!(first.volume, 1000.0);
        assert_eq!(first.timestamp.offset().local_minus_utc(), -18_000);
        assert_eq!(first.timestamp.timestamp(), 1_672_756_200);
    }

    #[test]
    fn drops_rows_with_missing_prices() {
        let mut columns = full_columns(3);
        columns[3].values[1] = None;
        let series = normalize_frame(&frame(columns, vec![100, 200, 300])).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![11.0, 13.0]);
    }

    #[test]
    fn fills_missing_adj_close_and_volume() {
        let mut columns = full_columns(2);
        columns.remove(4);
        columns[4].values[0] = None;
        let series = normalize_frame(&frame(columns, vec![100, 200])).unwrap();
        let first = series.first().unwrap();
        assert_eq!(first.adj_close, first.close);
        assert_eq!(first.volume, 0.0);
    }

    #[test]
    fn rejects_missing_required_column() {
        let mut columns = full_columns(2);
        columns.remove(1);
        assert_eq!(
            normalize_frame(&frame(columns, vec![100, 200])).unwrap_err(),
            NormalizeError::MissingColumn("high")
        );
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut columns = full_columns(2);
        columns[0].values.pop();
        assert!(matches!(
            normalize_frame(&frame(columns, vec![100, 200])),
            Err(NormalizeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn sorts_and_dedups_index() {
        let columns = full_columns(3);
        let series = normalize_frame(&frame(columns, vec![300, 100, 300])).unwrap();
        assert_eq!(series.len(), 2);
        // Row 2 (close 13.0) replaces row 0 (close 11.0) at t=300.
        assert_eq!(series.closes(), vec![12.0, 13.0]);
    }

    #[test]
    fn ignores_unknown_columns() {
        let mut columns = full_columns(1);
        columns.push(ProviderColumn::new("Dividends", vec![Some(0.2)]));
        assert!(normalize_frame(&frame(columns, vec![100])).is_ok());
    }

    #[test]
    fn empty_frame_yields_empty_series() {
        let series = normalize_frame(&frame(full_columns(0), vec![])).unwrap();
        assert!(series.is_empty());
    }
}
