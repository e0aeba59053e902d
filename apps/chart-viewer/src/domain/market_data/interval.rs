//! Interval mode and bar granularity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Days of intraday history the provider serves at sub-daily granularity.
pub const INTRADAY_MAX_LOOKBACK_DAYS: i64 = 59;

/// Default lookback for daily bars (one year).
pub const DAILY_DEFAULT_LOOKBACK_DAYS: i64 = 364;

/// Interval selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntervalMode {
    /// 5-minute bars, limited to the last 59 days.
    #[default]
    #[serde(alias = "intraday")]
    Intraday,
    /// One bar per trading day.
    #[serde(alias = "daily")]
    Daily,
}

impl IntervalMode {
    /// All interval modes, in display order.
    pub const ALL: [Self; 2] = [Self::Intraday, Self::Daily];

    /// Bar granularity requested from the provider.
    #[must_use]
    pub const fn granularity(self) -> BarGranularity {
        match self {
            Self::Intraday => BarGranularity::FiveMinutes,
            Self::Daily => BarGranularity::OneDay,
        }
    }

    /// Days between the default start date and today.
    #[must_use]
    pub const fn default_lookback_days(self) -> i64 {
        match self {
            Self::Intraday => INTRADAY_MAX_LOOKBACK_DAYS,
            Self::Daily => DAILY_DEFAULT_LOOKBACK_DAYS,
        }
    }

    /// Furthest the start date may lie in the past, if limited.
    #[must_use]
    pub const fn max_lookback_days(self) -> Option<i64> {
        match self {
            Self::Intraday => Some(INTRADAY_MAX_LOOKBACK_DAYS),
            Self::Daily => None,
        }
    }

    /// Label shown in forms and used as the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "Intraday",
            Self::Daily => "Daily",
        }
    }
}

impl fmt::Display for IntervalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intraday" => Ok(Self::Intraday),
            "daily" => Ok(Self::Daily),
            other => Err(DomainError::InvalidValue {
                field: "interval".to_string(),
                message: format!("unknown interval '{other}', expected Intraday or Daily"),
            }),
        }
    }
}

/// Bar size requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarGranularity {
    /// 5-minute bars.
    FiveMinutes,
    /// Daily bars.
    OneDay,
}

impl BarGranularity {
    /// Provider interval code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5m",
            Self::OneDay => "1d",
        }
    }

    /// Length of one bar in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::FiveMinutes => 300,
            Self::OneDay => 86_400,
        }
    }

    /// Whether bars are shorter than a day.
    #[must_use]
    pub const fn is_intraday(self) -> bool {
        matches!(self, Self::FiveMinutes)
    }
}

impl fmt::Display for BarGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Intraday", IntervalMode::Intraday ; "label")]
    #[test_case("intraday", IntervalMode::Intraday ; "lowercase")]
    #[test_case(" DAILY ", IntervalMode::Daily ; "padded uppercase")]
    fn interval_parses(raw: &str, expected: IntervalMode) {
        assert_eq!(raw.parse::<IntervalMode>().unwrap(), expected);
    }

    #[test]
    fn interval_rejects_unknown() {
        assert!("weekly".parse::<IntervalMode>().is_err());
    }

    #[test]
    fn interval_default_is_intraday() {
        assert_eq!(IntervalMode::default(), IntervalMode::Intraday);
    }

    #[test]
    fn interval_granularity() {
        assert_eq!(IntervalMode::Intraday.granularity().code(), "5m");
        assert_eq!(IntervalMode::Daily.granularity().code(), "1d");
    }

    #[test]
    fn interval_lookbacks() {
        assert_eq!(IntervalMode::Intraday.default_lookback_days(), 59);
        assert_eq!(IntervalMode::Daily.default_lookback_days(), 364);
        assert_eq!(IntervalMode::Intraday.max_lookback_days(), Some(59));
        assert_eq!(IntervalMode::Daily.max_lookback_days(), None);
    }

    #[test]
    fn interval_serde_accepts_lowercase_alias() {
        let mode: IntervalMode = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(mode, IntervalMode::Daily);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"Daily\"");
    }
}
