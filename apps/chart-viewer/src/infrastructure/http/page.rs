//! Server-rendered HTML page.
//!
//! The page is rebuilt from scratch on every request: input form and
//! notices always, then status messages, settings form, chart and data
//! table once a download was requested.

use std::fmt::Write;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::services::SeriesSource;
use crate::domain::charting::{ChartOptions, ChartStyle, ChartType, MovingAverageWindows};
use crate::domain::market_data::{COLUMNS, IntervalMode, Notice, NoticeLevel, Query, TimeSeries};
use crate::error::AppError;
use crate::infrastructure::render::escape;

use super::request::FORM_DATE_FORMAT;

/// Values echoed back into the input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Ticker.
    pub symbol: String,
    /// Interval selection.
    pub interval_mode: IntervalMode,
    /// Start date, if known.
    pub start_date: Option<NaiveDate>,
    /// End date, if known.
    pub end_date: Option<NaiveDate>,
}

impl FormFields {
    /// Fields for a collected query.
    #[must_use]
    pub fn from_query(query: &Query) -> Self {
        Self {
            symbol: query.symbol.to_string(),
            interval_mode: query.interval_mode,
            start_date: Some(query.start_date),
            end_date: Some(query.end_date),
        }
    }
}

/// Result of a completed download.
#[derive(Debug, Clone)]
pub struct DownloadView {
    /// Progress messages of the download; empty when served from cache.
    pub status: Vec<String>,
    /// Tier that answered.
    pub source: SeriesSource,
    /// Inline SVG chart.
    pub chart: String,
    /// Downloaded series.
    pub series: Arc<TimeSeries>,
}

/// Everything the page shows.
#[derive(Debug)]
pub struct PageView<'a> {
    /// Provider named in the subtitle.
    pub provider: &'a str,
    /// Input form values.
    pub fields: FormFields,
    /// Settings form values.
    pub options: ChartOptions,
    /// Input corrections.
    pub notices: Vec<Notice>,
    /// Download result, if one was requested and succeeded.
    pub download: Option<DownloadView>,
    /// Failure to report instead of the chart.
    pub error: Option<&'a AppError>,
}

/// Render the page.
///
/// # Errors
///
/// Only fails if writing to the buffer fails.
pub fn render_page(view: &PageView<'_>) -> Result<String, std::fmt::Error> {
    let mut html = String::with_capacity(128 * 1024);
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Historical Data Downloader</title>
<style>
body {{ font-family: sans-serif; margin: 2rem auto; max-width: 1560px; color: #262730; }}
.notice {{ padding: .6rem 1rem; border-radius: 4px; margin: .4rem 0; }}
.notice.error {{ background: #ffe4e4; }}
.notice.warning {{ background: #fff6d6; }}
.notice.info {{ background: #e4efff; }}
.status {{ color: #555; margin: .2rem 0; }}
.complete {{ background: #dff5e3; padding: .6rem 1rem; border-radius: 4px; }}
table {{ border-collapse: collapse; font-size: 12px; }}
td, th {{ border: 1px solid #ddd; padding: 2px 6px; text-align: right; }}
.table-wrap {{ max-height: 400px; overflow-y: auto; margin: 1rem 0; }}
form label {{ display: inline-block; margin: .3rem 1rem .3rem 0; }}
</style>
</head>
<body>
<h1>Historical Data Downloader</h1>
<p>This app downloads historical data from {provider}</p>
<p>Selected Stock: <strong>{symbol}</strong></p>
"#,
        provider = escape(view.provider),
        symbol = escape(&view.fields.symbol),
    )?;

    write_input_form(&mut html, view)?;
    for notice in &view.notices {
        write_notice(&mut html, notice)?;
    }

    if let Some(error) = view.error {
        write!(
            html,
            r#"<div class="notice error"><strong>{}</strong>: {}</div>"#,
            error.code(),
            escape(error.message())
        )?;
    }

    if let Some(download) = &view.download {
        for line in &download.status {
            write!(html, r#"<p class="status">{}</p>"#, escape(line))?;
        }
        if download.source == SeriesSource::Provider {
            html.push_str(r#"<div class="complete">Download complete</div>"#);
        }
        write_settings_form(&mut html, view)?;
        write!(html, r#"<div class="chart">{}</div>"#, download.chart)?;
        write_table(&mut html, &download.series)?;
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn write_notice(html: &mut String, notice: &Notice) -> std::fmt::Result {
    let class = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    write!(
        html,
        r#"<div class="notice {class}">{}</div>"#,
        escape(&notice.message)
    )
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(FORM_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn write_input_form(html: &mut String, view: &PageView<'_>) -> std::fmt::Result {
    let fields = &view.fields;
    write!(
        html,
        r#"<form method="get" action="/">
<label>Symbol: <input type="text" name="symbol" value="{}"></label>
<label>Interval <select name="interval">"#,
        escape(&fields.symbol)
    )?;
    for mode in IntervalMode::ALL {
        write_option(html, mode.as_str(), mode == fields.interval_mode)?;
    }
    write!(
        html,
        r#"</select></label>
<label>Start Date <input type="date" name="start_date" value="{}"></label>
<label>End Date <input type="date" name="end_date" value="{}"></label>
"#,
        date_value(fields.start_date),
        date_value(fields.end_date)
    )?;
    write_option_fields(html, &view.options)?;
    html.push_str(
        r#"<button type="submit" name="download" value="true">Download</button>
</form>
"#,
    );
    Ok(())
}

/// Carries the chart settings through a Download click.
fn write_option_fields(html: &mut String, options: &ChartOptions) -> std::fmt::Result {
    let [mav1, mav2, mav3] = options.moving_average_windows.windows();
    write!(
        html,
        r#"<input type="hidden" name="style" value="{}">
<input type="hidden" name="chart_type" value="{}">
<input type="hidden" name="mav1" value="{mav1}">
<input type="hidden" name="mav2" value="{mav2}">
<input type="hidden" name="mav3" value="{mav3}">
<input type="hidden" name="show_nontrading" value="{}">
"#,
        options.style,
        options.chart_type,
        options.show_nontrading_days
    )
}

fn write_settings_form(html: &mut String, view: &PageView<'_>) -> std::fmt::Result {
    let fields = &view.fields;
    let options = &view.options;
    write!(
        html,
        r#"<h2>Chart settings</h2>
<form method="get" action="/">
<input type="hidden" name="symbol" value="{}">
<input type="hidden" name="interval" value="{}">
<input type="hidden" name="start_date" value="{}">
<input type="hidden" name="end_date" value="{}">
<input type="hidden" name="download" value="true">
<input type="hidden" name="settings" value="1">
<label><input type="checkbox" name="show_nontrading" value="on"{}> Show non-trading days</label>
<label>Chart style <select name="style">"#,
        escape(&fields.symbol),
        fields.interval_mode,
        date_value(fields.start_date),
        date_value(fields.end_date),
        if options.show_nontrading_days { " checked" } else { "" }
    )?;
    for style in ChartStyle::ALL {
        write_option(html, style.as_str(), style == options.style)?;
    }
    html.push_str(r#"</select></label><label>Chart type <select name="chart_type">"#);
    for chart_type in ChartType::ALL {
        write_option(html, chart_type.as_str(), chart_type == options.chart_type)?;
    }
    html.push_str("</select></label>");
    for (index, window) in options.moving_average_windows.windows().iter().enumerate() {
        write!(
            html,
            r#"<label>Mav {n} <input type="number" name="mav{n}" min="{min}" max="{max}" step="1" value="{window}"></label>"#,
            n = index + 1,
            min = MovingAverageWindows::MIN,
            max = MovingAverageWindows::MAX,
        )?;
    }
    html.push_str("\n<button type=\"submit\">Apply</button>\n</form>\n");
    Ok(())
}

fn write_option(html: &mut String, value: &str, selected: bool) -> std::fmt::Result {
    write!(
        html,
        r#"<option value="{value}"{}>{value}</option>"#,
        if selected { " selected" } else { "" }
    )
}

fn write_table(html: &mut String, series: &TimeSeries) -> std::fmt::Result {
    html.push_str(r#"<div class="table-wrap"><table><thead><tr><th>timestamp</th>"#);
    for column in COLUMNS {
        write!(html, "<th>{column}</th>")?;
    }
    html.push_str("</tr></thead><tbody>");
    for bar in series.bars() {
        write!(html, "<tr><td>{}</td>", bar.timestamp.format("%Y-%m-%d %H:%M:%S%:z"))?;
        for value in bar.values() {
            write!(html, "<td>{value:.4}</td>")?;
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>\n");
    Ok(())
}
