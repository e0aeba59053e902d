//! Charting Bounded Context
//!
//! Chart options, indicators, price-driven constructions and the figure
//! model. Everything here is a pure function of its inputs.

pub mod bricks;
pub mod figure;
pub mod indicators;
pub mod layout;
pub mod options;
pub mod style;

pub use figure::{
    AxisTick, BrickGlyph, CandleGlyph, FIGURE_HEIGHT, FIGURE_WIDTH, Figure, MovingAverageLine,
    Panel, PanelKind, PlotElement, PnfGlyph, Point, VolumeBar, XAxis,
};
pub use layout::{RenderError, build_figure};
pub use options::{ChartOptions, ChartOptionsError, ChartStyle, ChartType, MovingAverageWindows};
pub use style::StylePalette;
