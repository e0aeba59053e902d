//! SVG figure encoder.
//!
//! Maps the figure's data coordinates to pixels and draws every element with
//! the style palette. Output is a standalone `<svg>` document.

use std::fmt::Write;

use crate::application::ports::FigureEncoderPort;
use crate::domain::charting::{
    Figure, Panel, PanelKind, PlotElement, Point, RenderError, StylePalette, XAxis,
};

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 50.0;
const PANEL_GAP: f64 = 12.0;
const Y_GRID_LINES: usize = 5;

/// Encodes figures as SVG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgFigureEncoder;

impl SvgFigureEncoder {
    /// Create a new encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FigureEncoderPort for SvgFigureEncoder {
    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn encode(&self, figure: &Figure) -> Result<String, RenderError> {
        let mut canvas = SvgCanvas::new(figure);
        canvas
            .draw(figure)
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        Ok(canvas.finish())
    }
}

/// Pixel rectangle of one panel.
#[derive(Debug, Clone, Copy)]
struct PanelFrame {
    top: f64,
    height: f64,
    y_min: f64,
    y_max: f64,
}

impl PanelFrame {
    fn y(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        if span <= 0.0 {
            return self.top + self.height / 2.0;
        }
        self.top + (self.y_max - value) / span * self.height
    }
}

struct SvgCanvas {
    out: String,
    width: f64,
    height: f64,
    palette: StylePalette,
    x_min: f64,
    x_span: f64,
    overlays: usize,
}

impl SvgCanvas {
    fn new(figure: &Figure) -> Self {
        let span = figure.x_axis.max - figure.x_axis.min;
        Self {
            out: String::with_capacity(64 * 1024),
            width: f64::from(figure.width),
            height: f64::from(figure.height),
            palette: figure.style.palette(),
            x_min: figure.x_axis.min,
            x_span: if span > 0.0 { span } else { 1.0 },
            overlays: 0,
        }
    }

    fn plot_width(&self) -> f64 {
        self.width - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn x(&self, value: f64) -> f64 {
        MARGIN_LEFT + (value - self.x_min) / self.x_span * self.plot_width()
    }

    /// Pixel width of `units` on the x axis, at least one pixel.
    fn x_len(&self, units: f64) -> f64 {
        (units / self.x_span * self.plot_width()).max(1.0)
    }

    fn frames(&self, panels: &[Panel]) -> Vec<PanelFrame> {
        let usable = self.height
            - MARGIN_TOP
            - MARGIN_BOTTOM
            - PANEL_GAP * panels.len().saturating_sub(1) as f64;
        let total_ratio: f64 = panels.iter().map(|p| p.height_ratio).sum();
        let mut top = MARGIN_TOP;
        panels
            .iter()
            .map(|panel| {
                let share = if total_ratio > 0.0 {
                    panel.height_ratio / total_ratio
                } else {
                    1.0 / panels.len() as f64
                };
                let frame = PanelFrame {
                    top,
                    height: usable * share,
                    y_min: panel.y_min,
                    y_max: panel.y_max,
                };
                top += frame.height + PANEL_GAP;
                frame
            })
            .collect()
    }

    fn draw(&mut self, figure: &Figure) -> std::fmt::Result {
        let p = self.palette;
        write!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = figure.width,
            h = figure.height
        )?;
        write!(
            self.out,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            figure.width, figure.height, p.background
        )?;
        write!(
            self.out,
            r#"<text x="{:.1}" y="{:.1}" font-size="22" text-anchor="middle" fill="{}">{}</text>"#,
            self.width / 2.0,
            MARGIN_TOP / 2.0 + 8.0,
            p.text,
            escape(&figure.title)
        )?;

        let frames = self.frames(&figure.panels);
        for (panel, frame) in figure.panels.iter().zip(&frames) {
            self.draw_panel_background(panel, frame, &figure.x_axis)?;
            for element in &panel.elements {
                self.draw_element(element, frame, &figure.x_axis)?;
            }
        }
        if let (Some(price), Some(frame)) = (figure.panel(PanelKind::Price), frames.first()) {
            self.draw_legend(price, frame)?;
        }
        if let Some(last) = frames.last() {
            self.draw_x_ticks(&figure.x_axis, last)?;
        }
        Ok(())
    }

    fn draw_panel_background(
        &mut self,
        panel: &Panel,
        frame: &PanelFrame,
        axis: &XAxis,
    ) -> std::fmt::Result {
        let p = self.palette;
        write!(
            self.out,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}"/>"#,
            MARGIN_LEFT,
            frame.top,
            self.plot_width(),
            frame.height,
            p.panel,
            p.text
        )?;

        for i in 0..=Y_GRID_LINES {
            let value = frame.y_min + (frame.y_max - frame.y_min) * i as f64 / Y_GRID_LINES as f64;
            let y = frame.y(value);
            write!(
                self.out,
                r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="0.5"/>"#,
                MARGIN_LEFT,
                MARGIN_LEFT + self.plot_width(),
                p.grid
            )?;
            write!(
                self.out,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end" fill="{}">{}</text>"#,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                p.text,
                axis_value(value, panel.kind)
            )?;
        }

        for tick in &axis.ticks {
            let x = self.x(tick.position);
            write!(
                self.out,
                r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="{}" stroke-width="0.5"/>"#,
                frame.top,
                frame.top + frame.height,
                p.grid
            )?;
        }

        let label = match panel.kind {
            PanelKind::Price => "Price",
            PanelKind::Volume => "Volume",
        };
        write!(
            self.out,
            r#"<text x="18" y="{:.1}" font-size="13" fill="{}" transform="rotate(-90 18 {:.1})" text-anchor="middle">{label}</text>"#,
            frame.top + frame.height / 2.0,
            p.text,
            frame.top + frame.height / 2.0
        )
    }

    fn draw_element(
        &mut self,
        element: &PlotElement,
        frame: &PanelFrame,
        axis: &XAxis,
    ) -> std::fmt::Result {
        let p = self.palette;
        let bar = self.x_len(axis.bar_width);
        match element {
            PlotElement::Candles(candles) => {
                for c in candles {
                    let x = self.x(c.x);
                    let fill = if c.is_rising() { p.up } else { p.down };
                    write!(
                        self.out,
                        r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="{}"/>"#,
                        frame.y(c.high),
                        frame.y(c.low),
                        p.edge
                    )?;
                    let top = frame.y(c.open.max(c.close));
                    let bottom = frame.y(c.open.min(c.close));
                    write!(
                        self.out,
                        r#"<rect x="{:.1}" y="{top:.1}" width="{bar:.1}" height="{:.1}" fill="{fill}" stroke="{}"/>"#,
                        x - bar / 2.0,
                        (bottom - top).max(1.0),
                        p.edge
                    )?;
                }
            }
            PlotElement::OhlcBars(bars) => {
                for c in bars {
                    let x = self.x(c.x);
                    let colour = if c.is_rising() { p.up } else { p.down };
                    let (open, close) = (frame.y(c.open), frame.y(c.close));
                    write!(
                        self.out,
                        r#"<path d="M{x:.1} {:.1}V{:.1}M{:.1} {open:.1}H{x:.1}M{x:.1} {close:.1}H{:.1}" stroke="{colour}" fill="none"/>"#,
                        frame.y(c.high),
                        frame.y(c.low),
                        x - bar / 2.0,
                        x + bar / 2.0
                    )?;
                }
            }
            PlotElement::Line(points) => self.polyline(points, frame, p.line, 1.5)?,
            PlotElement::Renko(bricks) => {
                for b in bricks {
                    let fill = if b.is_rising() { p.up } else { p.down };
                    let top = frame.y(b.open.max(b.close));
                    let bottom = frame.y(b.open.min(b.close));
                    write!(
                        self.out,
                        r#"<rect x="{:.1}" y="{top:.1}" width="{bar:.1}" height="{:.1}" fill="{fill}" stroke="{}"/>"#,
                        self.x(b.x) - bar / 2.0,
                        (bottom - top).max(1.0),
                        p.edge
                    )?;
                }
            }
            PlotElement::PointAndFigure(columns) => {
                for col in columns {
                    let x = self.x(col.x);
                    let half_w = bar / 2.0;
                    for index in 0..col.boxes() {
                        let level = col.level(index);
                        let y_top = frame.y(level + col.box_size / 2.0);
                        let y_bottom = frame.y(level - col.box_size / 2.0);
                        if col.rising {
                            write!(
                                self.out,
                                r#"<path d="M{:.1} {y_top:.1}L{:.1} {y_bottom:.1}M{:.1} {y_top:.1}L{:.1} {y_bottom:.1}" stroke="{}" fill="none"/>"#,
                                x - half_w,
                                x + half_w,
                                x + half_w,
                                x - half_w,
                                p.up
                            )?;
                        } else {
                            write!(
                                self.out,
                                r#"<ellipse cx="{x:.1}" cy="{:.1}" rx="{half_w:.1}" ry="{:.1}" stroke="{}" fill="none"/>"#,
                                (y_top + y_bottom) / 2.0,
                                ((y_bottom - y_top) / 2.0).abs().max(0.5),
                                p.down
                            )?;
                        }
                    }
                }
            }
            PlotElement::MovingAverage(line) => {
                let colour = self.overlay_colour(self.overlays);
                self.overlays += 1;
                self.polyline(&line.points, frame, colour, 1.2)?;
            }
            PlotElement::Volume(bars) => {
                let base = frame.y(0.0);
                for v in bars {
                    let fill = if v.rising { p.volume_up } else { p.volume_down };
                    let top = frame.y(v.volume);
                    write!(
                        self.out,
                        r#"<rect x="{:.1}" y="{top:.1}" width="{bar:.1}" height="{:.1}" fill="{fill}"/>"#,
                        self.x(v.x) - bar / 2.0,
                        (base - top).max(0.0)
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Colour of the `index`-th moving-average overlay.
    fn overlay_colour(&self, index: usize) -> &'static str {
        let colours = &self.palette.moving_averages;
        colours[index % colours.len()]
    }

    fn polyline(
        &mut self,
        points: &[Point],
        frame: &PanelFrame,
        colour: &str,
        width: f64,
    ) -> std::fmt::Result {
        if points.len() < 2 {
            return Ok(());
        }
        self.out.push_str(r#"<polyline points=""#);
        for point in points {
            write!(self.out, "{:.1},{:.1} ", self.x(point.x), frame.y(point.y))?;
        }
        write!(
            self.out,
            r#"" fill="none" stroke="{colour}" stroke-width="{width}"/>"#
        )
    }

    fn draw_legend(&mut self, panel: &Panel, frame: &PanelFrame) -> std::fmt::Result {
        let mut y = frame.top + 18.0;
        let lines = panel.elements.iter().filter_map(|element| match element {
            PlotElement::MovingAverage(line) => Some(line),
            _ => None,
        });
        for (index, line) in lines.enumerate() {
            let colour = self.overlay_colour(index);
            write!(
                self.out,
                r#"<text x="{:.1}" y="{y:.1}" font-size="12" fill="{colour}">MA {}</text>"#,
                MARGIN_LEFT + 10.0,
                line.window
            )?;
            y += 16.0;
        }
        Ok(())
    }

    fn draw_x_ticks(&mut self, axis: &XAxis, bottom: &PanelFrame) -> std::fmt::Result {
        let y = bottom.top + bottom.height + 18.0;
        for tick in &axis.ticks {
            write!(
                self.out,
                r#"<text x="{:.1}" y="{y:.1}" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
                self.x(tick.position),
                self.palette.text,
                escape(&tick.label)
            )?;
        }
        Ok(())
    }

    fn finish(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }
}

fn axis_value(value: f64, kind: PanelKind) -> String {
    match kind {
        PanelKind::Price => format!("{value:.2}"),
        PanelKind::Volume if value >= 1e9 => format!("{:.1}B", value / 1e9),
        PanelKind::Volume if value >= 1e6 => format!("{:.1}M", value / 1e6),
        PanelKind::Volume if value >= 1e3 => format!("{:.1}K", value / 1e3),
        PanelKind::Volume => format!("{value:.0}"),
    }
}

/// Escape text for SVG and HTML content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
