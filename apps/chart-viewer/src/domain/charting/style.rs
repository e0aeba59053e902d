//! Colour palettes for the named chart styles.

use super::options::ChartStyle;

/// Colours used to draw a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePalette {
    /// Figure background.
    pub background: &'static str,
    /// Panel (axes) background.
    pub panel: &'static str,
    /// Grid lines.
    pub grid: &'static str,
    /// Title, tick labels and axis lines.
    pub text: &'static str,
    /// Rising candle body / X column / up brick.
    pub up: &'static str,
    /// Falling candle body / O column / down brick.
    pub down: &'static str,
    /// Candle body outline and wick.
    pub edge: &'static str,
    /// Line chart stroke.
    pub line: &'static str,
    /// Volume bar on a rising bar.
    pub volume_up: &'static str,
    /// Volume bar on a falling bar.
    pub volume_down: &'static str,
    /// Moving-average line colours, cycled in window order.
    pub moving_averages: [&'static str; 3],
}

impl ChartStyle {
    /// Palette for this style.
    #[must_use]
    pub const fn palette(self) -> StylePalette {
        match self {
            Self::Default => StylePalette {
                background: "#ffffff",
                panel: "#dce3ef",
                grid: "#ffffff",
                text: "#1a1a1a",
                up: "#ffffff",
                down: "#000000",
                edge: "#000000",
                line: "#1f77b4",
                volume_up: "#1f77b4",
                volume_down: "#1f77b4",
                moving_averages: ["#40e0d0", "#ff00ff", "#ffd700"],
            },
            Self::Binance => StylePalette {
                background: "#ffffff",
                panel: "#ffffff",
                grid: "#e6e6e6",
                text: "#474d57",
                up: "#2ebd85",
                down: "#f6465d",
                edge: "#474d57",
                line: "#f0b90b",
                volume_up: "#2ebd85",
                volume_down: "#f6465d",
                moving_averages: ["#f0b90b", "#e377c2", "#7f7fff"],
            },
            Self::Blueskies => StylePalette {
                background: "#ffffff",
                panel: "#e6f0fa",
                grid: "#ffffff",
                text: "#1d3557",
                up: "#5b9bd5",
                down: "#1d3557",
                edge: "#1d3557",
                line: "#1d3557",
                volume_up: "#5b9bd5",
                volume_down: "#1d3557",
                moving_averages: ["#e76f51", "#2a9d8f", "#f4a261"],
            },
            Self::Brasil => StylePalette {
                background: "#ffffff",
                panel: "#fffde7",
                grid: "#e0e0e0",
                text: "#002776",
                up: "#009c3b",
                down: "#ffdf00",
                edge: "#002776",
                line: "#009c3b",
                volume_up: "#009c3b",
                volume_down: "#ffdf00",
                moving_averages: ["#002776", "#c62828", "#6a1b9a"],
            },
            Self::Charles => StylePalette {
                background: "#ffffff",
                panel: "#ffffff",
                grid: "#d9d9d9",
                text: "#000000",
                up: "#006340",
                down: "#a02128",
                edge: "#000000",
                line: "#006340",
                volume_up: "#006340",
                volume_down: "#a02128",
                moving_averages: ["#1f77b4", "#ff7f0e", "#9467bd"],
            },
            Self::Checkers => StylePalette {
                background: "#ffffff",
                panel: "#f0f0f0",
                grid: "#c8c8c8",
                text: "#000000",
                up: "#000000",
                down: "#ff0000",
                edge: "#000000",
                line: "#000000",
                volume_up: "#606060",
                volume_down: "#ff0000",
                moving_averages: ["#1f77b4", "#ff7f0e", "#2ca02c"],
            },
            Self::Classic => StylePalette {
                background: "#ffffff",
                panel: "#ffffff",
                grid: "#e0e0e0",
                text: "#000000",
                up: "#ffffff",
                down: "#000000",
                edge: "#000000",
                line: "#000000",
                volume_up: "#808080",
                volume_down: "#404040",
                moving_averages: ["#0000ff", "#ff0000", "#008000"],
            },
            Self::Yahoo => StylePalette {
                background: "#ffffff",
                panel: "#ffffff",
                grid: "#e6e6e6",
                text: "#232a31",
                up: "#00b060",
                down: "#fe3032",
                edge: "#606060",
                line: "#0081f2",
                volume_up: "#4dc790",
                volume_down: "#fd6b6c",
                moving_averages: ["#0081f2", "#ff8a00", "#7b3ff2"],
            },
            Self::Mike => StylePalette {
                background: "#0a0a0a",
                panel: "#0a0a0a",
                grid: "#2a2a2a",
                text: "#d0d0d0",
                up: "#ffffff",
                down: "#0080ff",
                edge: "#d0d0d0",
                line: "#ffffff",
                volume_up: "#7f7f7f",
                volume_down: "#0060c0",
                moving_averages: ["#ffff00", "#ff00ff", "#00ffff"],
            },
            Self::Nightclouds => StylePalette {
                background: "#0a0a23",
                panel: "#0a0a23",
                grid: "#1f1f4d",
                text: "#e0e0ff",
                up: "#ffffff",
                down: "#3f7fff",
                edge: "#e0e0ff",
                line: "#ffffff",
                volume_up: "#8080a0",
                volume_down: "#3f7fff",
                moving_averages: ["#ffd700", "#ff69b4", "#7fffd4"],
            },
            Self::Sas => StylePalette {
                background: "#ffffff",
                panel: "#fafafa",
                grid: "#dcdcdc",
                text: "#333333",
                up: "#33a02c",
                down: "#e31a1c",
                edge: "#333333",
                line: "#1f78b4",
                volume_up: "#b2df8a",
                volume_down: "#fb9a99",
                moving_averages: ["#1f78b4", "#ff7f00", "#6a3d9a"],
            },
            Self::Starsandstripes => StylePalette {
                background: "#ffffff",
                panel: "#ffffff",
                grid: "#e5e5e5",
                text: "#0a3161",
                up: "#0054a6",
                down: "#cc0000",
                edge: "#0a3161",
                line: "#0a3161",
                volume_up: "#0054a6",
                volume_down: "#cc0000",
                moving_averages: ["#b22234", "#3c3b6e", "#808080"],
            },
        }
    }
}
