//! Download query, cache key and input-correction notices.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::interval::IntervalMode;
use crate::domain::shared::Symbol;

/// Ticker pre-filled in the symbol field.
pub const DEFAULT_SYMBOL: &str = "RELIANCE.NS";

/// A validated download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Uppercased ticker.
    pub symbol: Symbol,
    /// Intraday or daily bars.
    pub interval_mode: IntervalMode,
    /// First day requested (inclusive).
    pub start_date: NaiveDate,
    /// Last day requested (exclusive at the provider).
    pub end_date: NaiveDate,
}

impl Query {
    /// Create a new query.
    #[must_use]
    pub fn new(
        symbol: impl Into<Symbol>,
        interval_mode: IntervalMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval_mode,
            start_date,
            end_date,
        }
    }

    /// Key identifying this query in the series cache.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            interval_mode: self.interval_mode,
            symbol: self.symbol.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Chart title: `"{symbol}, {start_date}"`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{}, {}", self.symbol, self.start_date)
    }

    /// Number of calendar days covered.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Cache key: the full argument tuple of a fetch.
///
/// Two queries share an entry only when every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    /// Interval mode.
    pub interval_mode: IntervalMode,
    /// Uppercased ticker.
    pub symbol: Symbol,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
}

impl CacheKey {
    /// Filesystem-safe stem, unique per key.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let symbol: String = self
            .symbol
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        // The raw symbol is hex-encoded too so "BRK-B" and "BRK.B" never collide.
        let raw: String = self
            .symbol
            .as_str()
            .bytes()
            .map(|b| format!("{b:02x}"))
            .collect();
        format!(
            "{}_{}_{}_{}_{}",
            self.interval_mode.as_str().to_ascii_lowercase(),
            symbol,
            raw,
            self.start_date.format("%Y%m%d"),
            self.end_date.format("%Y%m%d"),
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}..{}",
            self.interval_mode, self.symbol, self.start_date, self.end_date
        )
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something looks off but the request proceeds.
    Warning,
    /// A constraint was violated and corrected.
    Error,
}

/// A message surfaced to the user next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Default start date for an interval mode.
#[must_use]
pub fn default_start_date(interval_mode: IntervalMode, today: NaiveDate) -> NaiveDate {
    today - Duration::days(interval_mode.default_lookback_days())
}

/// Result of applying the interval's lookback limit to a start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDateCorrection {
    /// Date the user asked for.
    pub requested: NaiveDate,
    /// Date actually used.
    pub corrected: NaiveDate,
}

/// Clamp `start_date` so it is no further back than the interval allows.
///
/// Only moves the date forward. Returns the date to use and the correction,
/// if one was applied.
#[must_use]
pub fn clamp_start_date(
    interval_mode: IntervalMode,
    start_date: NaiveDate,
    today: NaiveDate,
) -> (NaiveDate, Option<StartDateCorrection>) {
    let Some(max_days) = interval_mode.max_lookback_days() else {
        return (start_date, None);
    };

    let earliest = today - Duration::days(max_days);
    if start_date < earliest {
        (
            earliest,
            Some(StartDateCorrection {
                requested: start_date,
                corrected: earliest,
            }),
        )
    } else {
        (start_date, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_start_dates() {
        let today = date(2024, 6, 30);
        assert_eq!(
            default_start_date(IntervalMode::Daily, today),
            today - Duration::days(364)
        );
        assert_eq!(
            default_start_date(IntervalMode::Intraday, today),
            today - Duration::days(59)
        );
    }

    #[test]
    fn clamp_moves_old_intraday_start_forward() {
        let today = date(2024, 6, 30);
        let (start, correction) =
            clamp_start_date(IntervalMode::Intraday, today - Duration::days(90), today);
        assert_eq!(start, today - Duration::days(59));
        let correction = correction.unwrap();
        assert_eq!(correction.requested, today - Duration::days(90));
        assert_eq!(correction.corrected, start);
    }

    #[test]
    fn clamp_keeps_boundary_date() {
        let today = date(2024, 6, 30);
        let boundary = today - Duration::days(59);
        let (start, correction) = clamp_start_date(IntervalMode::Intraday, boundary, today);
        assert_eq!(start, boundary);
        assert!(correction.is_none());
    }

    #[test]
    fn clamp_ignores_daily() {
        let today = date(2024, 6, 30);
        let old = date(2004, 1, 1);
        let (start, correction) = clamp_start_date(IntervalMode::Daily, old, today);
        assert_eq!(start, old);
        assert!(correction.is_none());
    }

    #[test]
    fn query_title_and_key() {
        let q = Query::new("aapl", IntervalMode::Daily, date(2023, 1, 1), date(2023, 1, 10));
        assert_eq!(q.title(), "AAPL, 2023-01-01");
        assert_eq!(q.span_days(), 9);
        let key = q.cache_key();
        assert_eq!(key.symbol.as_str(), "AAPL");
        assert_eq!(key.to_string(), "Daily:AAPL:2023-01-01..2023-01-10");
    }

    #[test]
    fn cache_key_differs_on_any_field() {
        let base = Query::new("AAPL", IntervalMode::Daily, date(2023, 1, 1), date(2023, 1, 10));
        let mut other = base.clone();
        other.interval_mode = IntervalMode::Intraday;
        assert_ne!(base.cache_key(), other.cache_key());

        let mut other = base.clone();
        other.end_date = date(2023, 1, 11);
        assert_ne!(base.cache_key(), other.cache_key());
    }

    #[test]
    fn cache_key_file_stem_is_safe_and_distinct() {
        let a = Query::new("BRK-B", IntervalMode::Daily, date(2023, 1, 1), date(2023, 1, 10));
        let b = Query::new("BRK.B", IntervalMode::Daily, date(2023, 1, 1), date(2023, 1, 10));
        let stem_a = a.cache_key().file_stem();
        let stem_b = b.cache_key().file_stem();
        assert_ne!(stem_a, stem_b);
        assert!(
            stem_a
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        );
        assert!(stem_a.starts_with("daily_BRK_B_"));
    }

    proptest! {
        #[test]
        fn intraday_start_never_older_than_limit(offset in 0i64..2000) {
            let today = date(2024, 6, 30);
            let requested = today - Duration::days(offset);
            let (start, correction) = clamp_start_date(IntervalMode::Intraday, requested, today);
            prop_assert!(start >= today - Duration::days(59));
            prop_assert_eq!(correction.is_some(), offset > 59);
            if offset > 59 {
                prop_assert_eq!(start, today - Duration::days(59));
            } else {
                prop_assert_eq!(start, requested);
            }
        }
    }
}
