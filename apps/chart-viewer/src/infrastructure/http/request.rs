//! HTTP request parameters.
//!
//! Every field arrives as optional text so that a blank form input means
//! "use the default" instead of failing deserialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::InputForm;
use crate::domain::charting::{ChartOptions, ChartStyle, ChartType, MovingAverageWindows};
use crate::domain::market_data::IntervalMode;
use crate::error::AppError;

/// Date format of HTML date inputs.
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Query string of the page, chart and series endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPageParams {
    /// Ticker.
    pub symbol: Option<String>,
    /// `Intraday` or `Daily`.
    pub interval: Option<String>,
    /// Start date (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// End date (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Set by the Download button.
    pub download: Option<String>,
    /// Style name.
    pub style: Option<String>,
    /// Chart type name.
    pub chart_type: Option<String>,
    /// First moving-average window.
    pub mav1: Option<String>,
    /// Second moving-average window.
    pub mav2: Option<String>,
    /// Third moving-average window.
    pub mav3: Option<String>,
    /// Checkbox; absent when unchecked.
    pub show_nontrading: Option<String>,
    /// Hidden marker sent with the settings form.
    pub settings: Option<String>,
}

impl ChartPageParams {
    /// Whether the Download button was pressed.
    #[must_use]
    pub fn download_requested(&self) -> bool {
        non_empty(&self.download).is_some_and(is_truthy)
    }

    /// Input-collection form values.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REQUEST` for an unknown interval or a malformed date.
    pub fn input_form(&self) -> Result<InputForm, AppError> {
        let interval_mode = non_empty(&self.interval)
            .map(str::parse::<IntervalMode>)
            .transpose()?;
        Ok(InputForm {
            symbol: non_empty(&self.symbol).map(str::to_string),
            interval_mode,
            start_date: parse_date("start_date", non_empty(&self.start_date))?,
            end_date: parse_date("end_date", non_empty(&self.end_date))?,
        })
    }

    /// Chart options; missing values take the settings-form defaults.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REQUEST` for an unknown style or chart type, or a
    /// window that is not a number in range.
    pub fn chart_options(&self) -> Result<ChartOptions, AppError> {
        let defaults = ChartOptions::default();
        let style = non_empty(&self.style)
            .map(str::parse::<ChartStyle>)
            .transpose()?
            .unwrap_or(defaults.style);
        let chart_type = non_empty(&self.chart_type)
            .map(str::parse::<ChartType>)
            .transpose()?
            .unwrap_or(defaults.chart_type);

        let [first, second, third] = defaults.moving_average_windows.windows();
        let moving_average_windows = MovingAverageWindows::new(
            parse_window("mav1", non_empty(&self.mav1), first)?,
            parse_window("mav2", non_empty(&self.mav2), second)?,
            parse_window("mav3", non_empty(&self.mav3), third)?,
        )?;

        // An unchecked checkbox is simply absent, so absence only means
        // "off" once the settings form itself was submitted.
        let show_nontrading_days = if non_empty(&self.settings).is_some() {
            non_empty(&self.show_nontrading).is_some_and(is_truthy)
        } else {
            non_empty(&self.show_nontrading).map_or(defaults.show_nontrading_days, is_truthy)
        };

        Ok(ChartOptions {
            style,
            chart_type,
            moving_average_windows,
            show_nontrading_days,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT).map_err(|e| {
                AppError::invalid_request(format!("Invalid {field} '{raw}': {e}"))
            })
        })
        .transpose()
}

fn parse_window(field: &str, value: Option<&str>, default: u32) -> Result<u32, AppError> {
    value.map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| AppError::invalid_request(format!("Invalid {field} '{raw}'")))
    })
}
