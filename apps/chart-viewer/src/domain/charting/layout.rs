//! Build a [`Figure`] from a series and chart options.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use super::bricks::{box_size, pnf_columns, renko_bricks};
use super::figure::{
    AxisTick, BrickGlyph, CandleGlyph, FIGURE_HEIGHT, FIGURE_WIDTH, Figure, MovingAverageLine,
    Panel, PanelKind, PlotElement, PnfGlyph, Point, VolumeBar, XAxis,
};
use super::indicators::simple_moving_average;
use super::options::{ChartOptions, ChartType};
use crate::domain::market_data::{BarGranularity, TimeSeries};

/// Target number of labelled x ticks.
const TARGET_TICKS: usize = 8;

/// Share of the figure height given to the price panel.
const PRICE_PANEL_RATIO: f64 = 0.75;

/// Errors raised while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The series has no rows.
    #[error("no data to chart for {symbol}")]
    EmptySeries {
        /// Ticker of the empty series.
        symbol: String,
    },

    /// The encoder could not produce a document.
    #[error("failed to encode figure: {0}")]
    Encoding(String),
}

/// Price-panel data before it is placed on the figure.
struct PriceTrack {
    xs: Vec<f64>,
    /// Timestamp labelling each x position.
    times: Vec<DateTime<FixedOffset>>,
    element: PlotElement,
    /// Values the moving averages run over.
    ma_source: Vec<f64>,
    volume: Vec<VolumeBar>,
    low: f64,
    high: f64,
}

/// Lay out the two-panel figure for `series`.
///
/// # Errors
///
/// Returns [`RenderError::EmptySeries`] when the series has no rows.
pub fn build_figure(
    series: &TimeSeries,
    options: &ChartOptions,
    title: impl Into<String>,
) -> Result<Figure, RenderError> {
    if series.is_empty() {
        return Err(RenderError::EmptySeries {
            symbol: series.symbol().to_string(),
        });
    }

    let track = match options.chart_type {
        ChartType::Candle | ChartType::Ohlc | ChartType::Line => {
            time_track(series, options.chart_type, options.show_nontrading_days)
        }
        ChartType::Renko => renko_track(series),
        ChartType::Pnf => pnf_track(series),
    };

    let mut price_elements = vec![track.element];
    for window in options.moving_average_windows.windows() {
        let points = simple_moving_average(&track.ma_source, window as usize)
            .into_iter()
            .zip(&track.xs)
            .filter_map(|(value, &x)| value.map(|y| Point { x, y }))
            .collect();
        price_elements.push(PlotElement::MovingAverage(MovingAverageLine { window, points }));
    }

    let (y_min, y_max) = padded_range(track.low, track.high);
    let max_volume = track
        .volume
        .iter()
        .map(|bar| bar.volume)
        .fold(0.0_f64, f64::max);
    let volume_top = if max_volume > 0.0 { max_volume * 1.1 } else { 1.0 };

    let first_x = track.xs.first().copied().unwrap_or(0.0);
    let last_x = track.xs.last().copied().unwrap_or(0.0);

    Ok(Figure {
        title: title.into(),
        width: FIGURE_WIDTH,
        height: FIGURE_HEIGHT,
        style: options.style,
        chart_type: options.chart_type,
        x_axis: XAxis {
            min: first_x - 1.0,
            max: last_x + 1.0,
            bar_width: 0.8,
            ticks: ticks(&track.xs, &track.times, series.granularity()),
        },
        panels: vec![
            Panel {
                kind: PanelKind::Price,
                y_min,
                y_max,
                height_ratio: PRICE_PANEL_RATIO,
                elements: price_elements,
            },
            Panel {
                kind: PanelKind::Volume,
                y_min: 0.0,
                y_max: volume_top,
                height_ratio: 1.0 - PRICE_PANEL_RATIO,
                elements: vec![PlotElement::Volume(track.volume)],
            },
        ],
    })
}

/// X positions for time-ordered bars.
///
/// With gaps shown, positions are elapsed time in bar-size units so weekends
/// and overnight sessions leave space; otherwise bars sit at consecutive
/// integers.
fn time_positions(series: &TimeSeries, show_nontrading: bool) -> Vec<f64> {
    let bars = series.bars();
    let Some(first) = bars.first() else {
        return Vec::new();
    };
    if !show_nontrading {
        return (0..bars.len()).map(|i| i as f64).collect();
    }
    let step = series.granularity().seconds() as f64;
    bars.iter()
        .map(|bar| (bar.timestamp - first.timestamp).num_seconds() as f64 / step)
        .collect()
}

fn time_track(series: &TimeSeries, chart_type: ChartType, show_nontrading: bool) -> PriceTrack {
    let bars = series.bars();
    let xs = time_positions(series, show_nontrading);

    let glyphs = || {
        bars.iter()
            .zip(&xs)
            .map(|(bar, &x)| CandleGlyph {
                x,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
            })
            .collect::<Vec<_>>()
    };

    let (element, low, high) = match chart_type {
        ChartType::Line => {
            let points = bars
                .iter()
                .zip(&xs)
                .map(|(bar, &x)| Point { x, y: bar.close })
                .collect();
            let (low, high) = min_max(bars.iter().map(|bar| bar.close));
            (PlotElement::Line(points), low, high)
        }
        ChartType::Ohlc => {
            let (low, high) = bar_extent(series);
            (PlotElement::OhlcBars(glyphs()), low, high)
        }
        _ => {
            let (low, high) = bar_extent(series);
            (PlotElement::Candles(glyphs()), low, high)
        }
    };

    let volume = bars
        .iter()
        .zip(&xs)
        .map(|(bar, &x)| VolumeBar {
            x,
            volume: bar.volume,
            rising: bar.is_rising(),
        })
        .collect();

    PriceTrack {
        times: bars.iter().map(|bar| bar.timestamp).collect(),
        ma_source: series.closes(),
        xs,
        element,
        volume,
        low,
        high,
    }
}

fn renko_track(series: &TimeSeries) -> PriceTrack {
    let bars = series.bars();
    let size = box_size(bars);
    let bricks = renko_bricks(bars, size);

    let xs: Vec<f64> = (0..bricks.len()).map(|i| i as f64).collect();
    let (low, high) = if bricks.is_empty() {
        close_band(series, size)
    } else {
        min_max(bricks.iter().flat_map(|b| [b.open, b.close]))
    };

    PriceTrack {
        times: bricks
            .iter()
            .map(|brick| bars[brick.bar_index].timestamp)
            .collect(),
        element: PlotElement::Renko(
            bricks
                .iter()
                .zip(&xs)
                .map(|(brick, &x)| BrickGlyph {
                    x,
                    open: brick.open,
                    close: brick.close,
                })
                .collect(),
        ),
        ma_source: bricks.iter().map(|brick| brick.close).collect(),
        volume: bricks
            .iter()
            .zip(&xs)
            .map(|(brick, &x)| VolumeBar {
                x,
                volume: brick.volume,
                rising: brick.is_rising(),
            })
            .collect(),
        xs,
        low,
        high,
    }
}

fn pnf_track(series: &TimeSeries) -> PriceTrack {
    let bars = series.bars();
    let size = box_size(bars);
    let columns = pnf_columns(bars, size);

    let xs: Vec<f64> = (0..columns.len()).map(|i| i as f64).collect();
    let (low, high) = if columns.is_empty() {
        close_band(series, size)
    } else {
        min_max(columns.iter().flat_map(|c| [c.low, c.high]))
    };

    PriceTrack {
        times: columns
            .iter()
            .map(|column| bars[column.first_bar].timestamp)
            .collect(),
        element: PlotElement::PointAndFigure(
            columns
                .iter()
                .zip(&xs)
                .map(|(column, &x)| PnfGlyph {
                    x,
                    low: column.low,
                    high: column.high,
                    box_size: size,
                    rising: column.rising,
                })
                .collect(),
        ),
        ma_source: columns.iter().map(|column| column.close()).collect(),
        volume: columns
            .iter()
            .zip(&xs)
            .map(|(column, &x)| VolumeBar {
                x,
                volume: column.volume,
                rising: column.rising,
            })
            .collect(),
        xs,
        low,
        high,
    }
}

fn bar_extent(series: &TimeSeries) -> (f64, f64) {
    let bars = series.bars();
    let (low, _) = min_max(bars.iter().map(|bar| bar.low));
    let (_, high) = min_max(bars.iter().map(|bar| bar.high));
    (low, high)
}

/// Range of closes widened by one box, for charts with no bricks or columns.
fn close_band(series: &TimeSeries, size: f64) -> (f64, f64) {
    let (low, high) = min_max(series.bars().iter().map(|bar| bar.close));
    (low - size, high + size)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Pad a value range by 5% on each side.
fn padded_range(low: f64, high: f64) -> (f64, f64) {
    if !(low.is_finite() && high.is_finite()) {
        return (0.0, 1.0);
    }
    let span = high - low;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (high.abs() * 0.05).max(1.0)
    };
    (low - pad, high + pad)
}

fn ticks(
    xs: &[f64],
    times: &[DateTime<FixedOffset>],
    granularity: BarGranularity,
) -> Vec<AxisTick> {
    if xs.is_empty() {
        return Vec::new();
    }
    let format = if granularity.is_intraday() {
        "%m-%d %H:%M"
    } else {
        "%Y-%m-%d"
    };
    let step = xs.len().div_ceil(TARGET_TICKS).max(1);
    xs.iter()
        .zip(times)
        .step_by(step)
        .map(|(&position, time)| AxisTick {
            position,
            label: time.format(format).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::charting::options::{ChartStyle, MovingAverageWindows};
    use crate::domain::market_data::series::test_support::daily_series;
    use crate::domain::market_data::{Bar, TimeSeries};
    use crate::domain::shared::Symbol;

    fn options(chart_type: ChartType) -> ChartOptions {
        ChartOptions {
            chart_type,
            ..ChartOptions::default()
        }
    }

    fn ramp(n: usize) -> TimeSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64) * 1.5).collect();
        daily_series(&closes)
    }

    /// Three daily bars with a weekend between the second and third.
    fn with_weekend_gap() -> TimeSeries {
        let base = daily_series(&[10.0, 11.0, 12.0]);
        let mut bars: Vec<Bar> = base.bars().to_vec();
        bars[2].timestamp = bars[1].timestamp + Duration::days(3);
        TimeSeries::new(Symbol::new("GAP"), BarGranularity::OneDay, bars).unwrap()
    }

    #[test]
    fn line_chart_has_two_panels_and_three_averages() {
        let figure = build_figure(&ramp(20), &options(ChartType::Line), "TEST, 2023-01-02").unwrap();
        assert_eq!(figure.panels.len(), 2);
        assert_eq!(figure.moving_average_count(), 3);
        let windows: Vec<u32> = figure.moving_averages().map(|l| l.window).collect();
        assert_eq!(windows, vec![3, 6, 9]);
        assert!(matches!(
            figure.panel(PanelKind::Price).unwrap().elements[0],
            PlotElement::Line(_)
        ));
    }

    #[test]
    fn figure_size_title_and_style() {
        let opts = ChartOptions {
            style: ChartStyle::Mike,
            ..ChartOptions::default()
        };
        let figure = build_figure(&ramp(5), &opts, "TEST, 2023-01-02").unwrap();
        assert_eq!((figure.width, figure.height), (1500, 1000));
        assert_eq!(figure.title, "TEST, 2023-01-02");
        assert_eq!(figure.style, ChartStyle::Mike);
    }

    #[test]
    fn empty_series_is_an_error() {
        let empty = TimeSeries::new(Symbol::new("NONE"), BarGranularity::OneDay, vec![]).unwrap();
        let err = build_figure(&empty, &ChartOptions::default(), "x").unwrap_err();
        assert_eq!(
            err,
            RenderError::EmptySeries {
                symbol: "NONE".to_string()
            }
        );
    }

    #[test]
    fn long_window_yields_empty_line() {
        let opts = ChartOptions {
            moving_average_windows: MovingAverageWindows::new(3, 6, 30).unwrap(),
            ..ChartOptions::default()
        };
        let figure = build_figure(&ramp(10), &opts, "t").unwrap();
        let lines: Vec<&MovingAverageLine> = figure.moving_averages().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].points.len(), 8);
        assert_eq!(lines[1].points.len(), 5);
        assert!(lines[2].points.is_empty());
    }

    #[test]
    fn hidden_gaps_use_consecutive_positions() {
        let opts = ChartOptions {
            show_nontrading_days: false,
            ..ChartOptions::default()
        };
        let figure = build_figure(&with_weekend_gap(), &opts, "t").unwrap();
        let PlotElement::Candles(candles) = &figure.panels[0].elements[0] else {
            panic!("expected candles");
        };
        let xs: Vec<f64> = candles.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn shown_gaps_use_time_positions() {
        let figure = build_figure(&with_weekend_gap(), &ChartOptions::default(), "t").unwrap();
        let PlotElement::Candles(candles) = &figure.panels[0].elements[0] else {
            panic!("expected candles");
        };
        let xs: Vec<f64> = candles.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 4.0]);
        assert_eq!(figure.x_axis.max, 5.0);
    }

    #[test]
    fn ohlc_range_covers_highs_and_lows() {
        let figure = build_figure(&ramp(4), &options(ChartType::Ohlc), "t").unwrap();
        let price = figure.panel(PanelKind::Price).unwrap();
        assert!(price.y_min < 99.0);
        assert!(price.y_max > 105.5);
        assert!(matches!(price.elements[0], PlotElement::OhlcBars(_)));
    }

    #[test]
    fn volume_panel_matches_bars() {
        let series = ramp(6);
        let figure = build_figure(&series, &ChartOptions::default(), "t").unwrap();
        let volume = figure.panel(PanelKind::Volume).unwrap();
        let PlotElement::Volume(bars) = &volume.elements[0] else {
            panic!("expected volume");
        };
        assert_eq!(bars.len(), series.len());
        assert_eq!(volume.y_min, 0.0);
        assert!(volume.y_max >= 1_005.0);
    }

    #[test]
    fn renko_uses_brick_index_positions() {
        let figure = build_figure(&ramp(30), &options(ChartType::Renko), "t").unwrap();
        let PlotElement::Renko(bricks) = &figure.panels[0].elements[0] else {
            panic!("expected renko");
        };
        assert!(!bricks.is_empty());
        for (i, brick) in bricks.iter().enumerate() {
            assert_eq!(brick.x, i as f64);
        }
        assert_eq!(figure.moving_average_count(), 3);
    }

    #[test]
    fn pnf_uses_column_positions() {
        // Up 30 one point at a time, then back down: box size is ATR = 2.0.
        let closes: Vec<f64> = (0..=30)
            .chain((0..30).rev())
            .map(|step| 100.0 + f64::from(step))
            .collect();
        let figure = build_figure(&daily_series(&closes), &options(ChartType::Pnf), "t").unwrap();
        let PlotElement::PointAndFigure(columns) = &figure.panels[0].elements[0] else {
            panic!("expected point and figure");
        };
        assert!(columns.len() >= 2);
        assert!(columns[0].rising);
        assert!(!columns[1].rising);
        assert_eq!(figure.panels.len(), 2);
    }

    #[test]
    fn flat_renko_still_renders() {
        let figure =
            build_figure(&daily_series(&[10.0; 5]), &options(ChartType::Renko), "t").unwrap();
        let price = figure.panel(PanelKind::Price).unwrap();
        assert!(price.y_min < 10.0 && price.y_max > 10.0);
    }

    #[test]
    fn tick_labels_follow_granularity() {
        let figure = build_figure(&ramp(20), &ChartOptions::default(), "t").unwrap();
        assert!(figure.x_axis.ticks.len() <= TARGET_TICKS);
        assert_eq!(figure.x_axis.ticks[0].label, "2023-01-02");
    }
}
