//! Price-driven constructions: renko bricks and point-and-figure columns.
//!
//! Both discard time. A renko brick is drawn each time the close moves one
//! box beyond the previous brick; a point-and-figure column of Xs (rising)
//! or Os (falling) grows until price reverses by [`PNF_REVERSAL_BOXES`].

use super::indicators::{ATR_PERIOD, average_true_range};
use crate::domain::market_data::Bar;

/// Boxes price must retrace before a new point-and-figure column starts.
pub const PNF_REVERSAL_BOXES: u32 = 3;

/// Upper bound on bricks or columns produced for one series.
pub const MAX_ELEMENTS: usize = 10_000;

/// Smallest ATR box accepted, relative to the last close.
pub const MIN_RELATIVE_BOX: f64 = 1e-6;

/// Box size for renko and point-and-figure charts.
///
/// ATR over the last 14 bars; falls back to 1% of the last close, then to 1.0.
/// An ATR below [`MIN_RELATIVE_BOX`] of the last close counts as no ATR.
#[must_use]
pub fn box_size(bars: &[Bar]) -> f64 {
    let floor = bars.last().map_or(0.0, |bar| bar.close.abs() * MIN_RELATIVE_BOX);
    if let Some(atr) = average_true_range(bars, ATR_PERIOD)
        .filter(|v| v.is_finite() && *v > 0.0 && *v >= floor)
    {
        return atr;
    }
    bars.last()
        .map(|bar| bar.close.abs() * 0.01)
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(1.0)
}

/// One renko brick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenkoBrick {
    /// Index of the bar whose close formed the brick.
    pub bar_index: usize,
    /// Price the brick starts from.
    pub open: f64,
    /// Price the brick ends at.
    pub close: f64,
    /// Share of the forming bar's volume.
    pub volume: f64,
}

impl RenkoBrick {
    /// Whether the brick moves up.
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.close > self.open
    }

    /// Upper edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Lower edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.open.min(self.close)
    }
}

/// Build renko bricks from closing prices.
///
/// Continuation needs one box beyond the last brick; reversal needs one box
/// beyond the last brick's open (two boxes from its close). Bricks formed on
/// the same bar share that bar's volume evenly.
#[must_use]
pub fn renko_bricks(bars: &[Bar], box_size: f64) -> Vec<RenkoBrick> {
    let Some(first) = bars.first() else {
        return Vec::new();
    };
    if !(box_size.is_finite() && box_size > 0.0) {
        return Vec::new();
    }

    let mut top = first.close;
    let mut bottom = first.close;
    let mut bricks = Vec::new();

    for (bar_index, bar) in bars.iter().enumerate().skip(1) {
        let formed_from = bricks.len();
        let close = bar.close;

        // A box below the price's resolution cannot move the edges.
        while close >= top + box_size && top + box_size > top && bricks.len() < MAX_ELEMENTS {
            bricks.push(RenkoBrick {
                bar_index,
                open: top,
                close: top + box_size,
                volume: 0.0,
            });
            bottom = top;
            top += box_size;
        }
        while close <= bottom - box_size
            && bottom - box_size < bottom
            && bricks.len() < MAX_ELEMENTS
        {
            bricks.push(RenkoBrick {
                bar_index,
                open: bottom,
                close: bottom - box_size,
                volume: 0.0,
            });
            top = bottom;
            bottom -= box_size;
        }

        let formed = bricks.len() - formed_from;
        if formed > 0 {
            let share = bar.volume / formed as f64;
            for brick in &mut bricks[formed_from..] {
                brick.volume = share;
            }
        }
        if bricks.len() >= MAX_ELEMENTS {
            tracing::warn!(box_size, "renko brick limit reached");
            break;
        }
    }

    bricks
}

/// One point-and-figure column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnfColumn {
    /// Bar that opened the column.
    pub first_bar: usize,
    /// Last bar that extended the column.
    pub last_bar: usize,
    /// Lowest box.
    pub low: f64,
    /// Highest box.
    pub high: f64,
    /// Xs when rising, Os when falling.
    pub rising: bool,
    /// Volume traded while the column was current.
    pub volume: f64,
}

impl PnfColumn {
    /// Number of boxes in the column.
    #[must_use]
    pub fn boxes(&self, box_size: f64) -> u32 {
        let span = ((self.high - self.low) / box_size).round();
        // Saturating cast; callers that iterate cap the count themselves.
        span.max(0.0) as u32 + 1
    }

    /// Column extreme in its direction: high for X, low for O.
    #[must_use]
    pub fn close(&self) -> f64 {
        if self.rising { self.high } else { self.low }
    }
}

/// Build point-and-figure columns from closing prices.
///
/// The first column starts one box beyond the first close. A reversal of
/// [`PNF_REVERSAL_BOXES`] boxes starts a new column one box beyond the prior
/// column's extreme.
#[must_use]
pub fn pnf_columns(bars: &[Bar], box_size: f64) -> Vec<PnfColumn> {
    let Some(first) = bars.first() else {
        return Vec::new();
    };
    if !(box_size.is_finite() && box_size > 0.0) {
        return Vec::new();
    }

    let reversal = f64::from(PNF_REVERSAL_BOXES) * box_size;
    let anchor = first.close;
    let mut pending_volume = first.volume;
    let mut columns: Vec<PnfColumn> = Vec::new();

    for (bar_index, bar) in bars.iter().enumerate().skip(1) {
        let close = bar.close;

        let Some(current) = columns.last_mut() else {
            pending_volume += bar.volume;
            let boxes = ((close - anchor) / box_size).trunc();
            if boxes.abs() >= 1.0 {
                let (low, high) = if boxes > 0.0 {
                    (anchor + box_size, anchor + boxes * box_size)
                } else {
                    (anchor + boxes * box_size, anchor - box_size)
                };
                columns.push(PnfColumn {
                    first_bar: 0,
                    last_bar: bar_index,
                    low,
                    high,
                    rising: boxes > 0.0,
                    volume: pending_volume,
                });
            }
            continue;
        };

        if current.rising {
            if close >= current.high + box_size {
                current.high += ((close - current.high) / box_size).floor() * box_size;
                current.last_bar = bar_index;
                current.volume += bar.volume;
            } else if close <= current.high - reversal {
                let high = current.high - box_size;
                let low = current.high - ((current.high - close) / box_size).floor() * box_size;
                columns.push(PnfColumn {
                    first_bar: bar_index,
                    last_bar: bar_index,
                    low,
                    high,
                    rising: false,
                    volume: bar.volume,
                });
            } else {
                current.volume += bar.volume;
            }
        } else if close <= current.low - box_size {
            current.low -= ((current.low - close) / box_size).floor() * box_size;
            current.last_bar = bar_index;
            current.volume += bar.volume;
        } else if close >= current.low + reversal {
            let low = current.low + box_size;
            let high = current.low + ((close - current.low) / box_size).floor() * box_size;
            columns.push(PnfColumn {
                first_bar: bar_index,
                last_bar: bar_index,
                low,
                high,
                rising: true,
                volume: bar.volume,
            });
        } else {
            current.volume += bar.volume;
        }

        if columns.len() >= MAX_ELEMENTS {
            tracing::warn!(box_size, "point-and-figure column limit reached");
            break;
        }
    }

    columns
}
