//! Renderer-independent figure model.
//!
//! A [`Figure`] holds data coordinates only; the encoder maps them to pixels
//! and applies the style palette.

use serde::Serialize;

use super::bricks::MAX_ELEMENTS;
use super::options::{ChartStyle, ChartType};

/// Figure width in pixels.
pub const FIGURE_WIDTH: u32 = 1500;

/// Figure height in pixels.
pub const FIGURE_HEIGHT: u32 = 1000;

/// A complete chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Title drawn above the price panel.
    pub title: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Palette to draw with.
    pub style: ChartStyle,
    /// Encoding of the price panel.
    pub chart_type: ChartType,
    /// Shared x axis.
    pub x_axis: XAxis,
    /// Panels from top to bottom.
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Panel of the given kind.
    #[must_use]
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.kind == kind)
    }

    /// Moving-average overlays on the price panel.
    pub fn moving_averages(&self) -> impl Iterator<Item = &MovingAverageLine> {
        self.panel(PanelKind::Price)
            .into_iter()
            .flat_map(|panel| panel.elements.iter())
            .filter_map(|element| match element {
                PlotElement::MovingAverage(line) => Some(line),
                _ => None,
            })
    }

    /// Number of moving-average overlays.
    #[must_use]
    pub fn moving_average_count(&self) -> usize {
        self.moving_averages().count()
    }
}

/// Horizontal axis shared by every panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    /// Left edge in data units.
    pub min: f64,
    /// Right edge in data units.
    pub max: f64,
    /// Width of one bar, brick or column in data units.
    pub bar_width: f64,
    /// Labelled ticks.
    pub ticks: Vec<AxisTick>,
}

/// A labelled tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    /// Position in data units.
    pub position: f64,
    /// Label text.
    pub label: String,
}

/// Panel role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    /// Prices and overlays.
    Price,
    /// Traded volume.
    Volume,
}

/// One stacked panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Role.
    pub kind: PanelKind,
    /// Bottom of the value range.
    pub y_min: f64,
    /// Top of the value range.
    pub y_max: f64,
    /// Share of the figure height.
    pub height_ratio: f64,
    /// Drawn in order.
    pub elements: Vec<PlotElement>,
}

/// Something drawn inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PlotElement {
    /// Candlesticks.
    Candles(Vec<CandleGlyph>),
    /// OHLC bars.
    OhlcBars(Vec<CandleGlyph>),
    /// Close line.
    Line(Vec<Point>),
    /// Renko bricks.
    Renko(Vec<BrickGlyph>),
    /// Point-and-figure columns.
    PointAndFigure(Vec<PnfGlyph>),
    /// Moving-average overlay.
    MovingAverage(MovingAverageLine),
    /// Volume bars.
    Volume(Vec<VolumeBar>),
}

/// A point in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// X position.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

/// One candle or OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandleGlyph {
    /// X position.
    pub x: f64,
    /// Open.
    pub open: f64,
    /// High.
    pub high: f64,
    /// Low.
    pub low: f64,
    /// Close.
    pub close: f64,
}

impl CandleGlyph {
    /// Whether the bar closed at or above its open.
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }
}

/// One renko brick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrickGlyph {
    /// X position.
    pub x: f64,
    /// Start price.
    pub open: f64,
    /// End price.
    pub close: f64,
}

impl BrickGlyph {
    /// Whether the brick moves up.
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.close > self.open
    }
}

/// One point-and-figure column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnfGlyph {
    /// X position.
    pub x: f64,
    /// Lowest box.
    pub low: f64,
    /// Highest box.
    pub high: f64,
    /// Box height.
    pub box_size: f64,
    /// Xs when true, Os when false.
    pub rising: bool,
}

impl PnfGlyph {
    /// Number of boxes to draw, capped at [`MAX_ELEMENTS`].
    #[must_use]
    pub fn boxes(&self) -> usize {
        if !(self.box_size.is_finite() && self.box_size > 0.0) {
            return 0;
        }
        let span = ((self.high - self.low) / self.box_size).round();
        if span.is_nan() {
            return 0;
        }
        span.clamp(0.0, (MAX_ELEMENTS - 1) as f64) as usize + 1
    }

    /// Centre of the box at `index`, counting up from the lowest.
    #[must_use]
    pub fn level(&self, index: usize) -> f64 {
        self.low + index as f64 * self.box_size
    }
}

/// A moving-average overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageLine {
    /// Window length.
    pub window: u32,
    /// Defined points only; empty when the window exceeds the data.
    pub points: Vec<Point>,
}

/// One volume bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBar {
    /// X position.
    pub x: f64,
    /// Height.
    pub volume: f64,
    /// Colour as rising.
    pub rising: bool,
}
