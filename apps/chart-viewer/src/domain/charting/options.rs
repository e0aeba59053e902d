//! Chart options selected in the settings form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building chart options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartOptionsError {
    /// Moving-average window outside the accepted range.
    #[error("moving average window {window} is outside {min}..={max}")]
    WindowOutOfRange {
        /// Offending window.
        window: u32,
        /// Smallest accepted window.
        min: u32,
        /// Largest accepted window.
        max: u32,
    },

    /// Unknown style name.
    #[error("unknown chart style '{0}'")]
    UnknownStyle(String),

    /// Unknown chart type name.
    #[error("unknown chart type '{0}'")]
    UnknownChartType(String),
}

/// Named visual style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    /// Light blue-grey panels.
    Default,
    /// Exchange green/red on white.
    Binance,
    /// Soft blue.
    Blueskies,
    /// Green and yellow.
    Brasil,
    /// Dark green/red on white.
    Charles,
    /// Black and red on grey.
    Checkers,
    /// Hollow white/black bodies.
    Classic,
    /// Web portal green/red.
    Yahoo,
    /// Dark background.
    Mike,
    /// Dark navy background.
    Nightclouds,
    /// Muted green/red.
    Sas,
    /// Blue up, red down.
    #[default]
    Starsandstripes,
}

impl ChartStyle {
    /// All styles, in menu order.
    pub const ALL: [Self; 12] = [
        Self::Default,
        Self::Binance,
        Self::Blueskies,
        Self::Brasil,
        Self::Charles,
        Self::Checkers,
        Self::Classic,
        Self::Yahoo,
        Self::Mike,
        Self::Nightclouds,
        Self::Sas,
        Self::Starsandstripes,
    ];

    /// Style name as shown in the menu.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Binance => "binance",
            Self::Blueskies => "blueskies",
            Self::Brasil => "brasil",
            Self::Charles => "charles",
            Self::Checkers => "checkers",
            Self::Classic => "classic",
            Self::Yahoo => "yahoo",
            Self::Mike => "mike",
            Self::Nightclouds => "nightclouds",
            Self::Sas => "sas",
            Self::Starsandstripes => "starsandstripes",
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartStyle {
    type Err = ChartOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| ChartOptionsError::UnknownStyle(s.to_string()))
    }
}

/// Visual encoding of the price panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Candlesticks.
    #[default]
    Candle,
    /// OHLC bars with open/close ticks.
    Ohlc,
    /// Close-price line.
    Line,
    /// Renko bricks.
    Renko,
    /// Point-and-figure columns.
    Pnf,
}

impl ChartType {
    /// All chart types, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Candle,
        Self::Ohlc,
        Self::Line,
        Self::Renko,
        Self::Pnf,
    ];

    /// Type name as shown in the menu.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Candle => "candle",
            Self::Ohlc => "ohlc",
            Self::Line => "line",
            Self::Renko => "renko",
            Self::Pnf => "pnf",
        }
    }

    /// Whether the x axis is a brick/column index rather than time.
    #[must_use]
    pub const fn is_price_driven(self) -> bool {
        matches!(self, Self::Renko | Self::Pnf)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|chart_type| chart_type.as_str() == wanted)
            .ok_or_else(|| ChartOptionsError::UnknownChartType(s.to_string()))
    }
}

/// Three simple-moving-average window lengths, each in `3..=30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u32; 3]", into = "[u32; 3]")]
pub struct MovingAverageWindows([u32; 3]);

impl MovingAverageWindows {
    /// Smallest window accepted.
    pub const MIN: u32 = 3;
    /// Largest window accepted.
    pub const MAX: u32 = 30;

    /// Create windows, rejecting any value outside `3..=30`.
    pub fn new(first: u32, second: u32, third: u32) -> Result<Self, ChartOptionsError> {
        let windows = [first, second, third];
        if let Some(&window) = windows
            .iter()
            .find(|w| !(Self::MIN..=Self::MAX).contains(*w))
        {
            return Err(ChartOptionsError::WindowOutOfRange {
                window,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(windows))
    }

    /// Windows in configured order.
    #[must_use]
    pub const fn windows(&self) -> [u32; 3] {
        self.0
    }
}

impl Default for MovingAverageWindows {
    fn default() -> Self {
        Self([3, 6, 9])
    }
}

impl TryFrom<[u32; 3]> for MovingAverageWindows {
    type Error = ChartOptionsError;

    fn try_from(value: [u32; 3]) -> Result<Self, Self::Error> {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<MovingAverageWindows> for [u32; 3] {
    fn from(value: MovingAverageWindows) -> Self {
        value.0
    }
}

/// Options for one rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Visual style.
    pub style: ChartStyle,
    /// Price panel encoding.
    pub chart_type: ChartType,
    /// Moving-average overlays.
    pub moving_average_windows: MovingAverageWindows,
    /// Keep gaps for weekends, holidays and overnight sessions.
    pub show_nontrading_days: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            style: ChartStyle::default(),
            chart_type: ChartType::default(),
            moving_average_windows: MovingAverageWindows::default(),
            show_nontrading_days: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_match_settings_form() {
        let options = ChartOptions::default();
        assert_eq!(options.style, ChartStyle::Starsandstripes);
        assert_eq!(options.chart_type, ChartType::Candle);
        assert_eq!(options.moving_average_windows.windows(), [3, 6, 9]);
        assert!(options.show_nontrading_days);
    }

    #[test]
    fn twelve_styles_parse_by_name() {
        assert_eq!(ChartStyle::ALL.len(), 12);
        for style in ChartStyle::ALL {
            assert_eq!(style.as_str().parse::<ChartStyle>().unwrap(), style);
        }
        assert!("neon".parse::<ChartStyle>().is_err());
    }

    #[test_case("candle", ChartType::Candle)]
    #[test_case("OHLC", ChartType::Ohlc)]
    #[test_case(" line", ChartType::Line)]
    #[test_case("renko", ChartType::Renko)]
    #[test_case("pnf", ChartType::Pnf)]
    fn chart_types_parse(raw: &str, expected: ChartType) {
        assert_eq!(raw.parse::<ChartType>().unwrap(), expected);
    }

    #[test_case(3, 6, 9, true ; "defaults")]
    #[test_case(3, 3, 3, true ; "minimum")]
    #[test_case(30, 30, 30, true ; "maximum")]
    #[test_case(2, 6, 9, false ; "below minimum")]
    #[test_case(3, 31, 9, false ; "above maximum")]
    fn window_bounds(a: u32, b: u32, c: u32, ok: bool) {
        assert_eq!(MovingAverageWindows::new(a, b, c).is_ok(), ok);
    }

    #[test]
    fn window_error_names_offender() {
        let err = MovingAverageWindows::new(3, 31, 40).unwrap_err();
        assert_eq!(
            err,
            ChartOptionsError::WindowOutOfRange {
                window: 31,
                min: 3,
                max: 30
            }
        );
    }

    #[test]
    fn windows_deserialize_with_validation() {
        let ok: MovingAverageWindows = serde_json::from_str("[5,10,20]").unwrap();
        assert_eq!(ok.windows(), [5, 10, 20]);
        assert!(serde_json::from_str::<MovingAverageWindows>("[1,10,20]").is_err());
    }
}
