//! Overlay indicators: simple moving average and average true range.

use std::collections::VecDeque;

use crate::domain::market_data::Bar;

/// Period used to derive renko and point-and-figure box sizes.
pub const ATR_PERIOD: usize = 14;

/// Fixed-window running mean.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    /// Create an accumulator over `window` values. A zero window is treated as one.
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    /// Push a value, evicting the oldest once the window is full.
    pub fn feed(&mut self, value: f64) {
        if self.values.len() == self.window
            && let Some(oldest) = self.values.pop_front()
        {
            self.sum -= oldest;
        }
        self.values.push_back(value);
        self.sum += value;
    }

    /// Mean of the window, once it is full.
    #[must_use]
    pub fn avg(&self) -> Option<f64> {
        (self.values.len() == self.window).then(|| self.sum / self.window as f64)
    }
}

/// Simple moving average of `values` over `window`.
///
/// The output has the same length as the input; positions before the window
/// fills are `None`.
#[must_use]
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut mean = RollingMean::new(window);
    values
        .iter()
        .map(|&value| {
            mean.feed(value);
            mean.avg()
        })
        .collect()
}

/// True range of each bar (the first bar uses high - low).
#[must_use]
pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    let mut previous_close: Option<f64> = None;
    bars.iter()
        .map(|bar| {
            let range = previous_close.map_or(bar.high - bar.low, |prev| {
                (bar.high - bar.low)
                    .max((bar.high - prev).abs())
                    .max((bar.low - prev).abs())
            });
            previous_close = Some(bar.close);
            range
        })
        .collect()
}

/// Mean of the last `period` true ranges.
///
/// Uses every available bar when fewer than `period` exist; `None` when
/// there are no bars.
#[must_use]
pub fn average_true_range(bars: &[Bar], period: usize) -> Option<f64> {
    let ranges = true_ranges(bars);
    if ranges.is_empty() {
        return None;
    }
    let take = period.max(1).min(ranges.len());
    let tail = &ranges[ranges.len() - take..];
    Some(tail.iter().sum::<f64>() / take as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::series::test_support::daily_series;
    use proptest::prelude::*;

    #[test]
    fn sma_fills_after_window() {
        let sma = simple_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(sma, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn sma_longer_than_input_is_all_none() {
        let sma = simple_moving_average(&[1.0, 2.0], 9);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn rolling_mean_zero_window_behaves_as_one() {
        let mut mean = RollingMean::new(0);
        mean.feed(4.0);
        assert_eq!(mean.avg(), Some(4.0));
        mean.feed(6.0);
        assert_eq!(mean.avg(), Some(6.0));
    }

    #[test]
    fn atr_of_constant_ranges() {
        // daily_series bars have high - low == 2.0 and consecutive closes 1.0 apart.
        let series = daily_series(&[10.0, 11.0, 12.0, 13.0]);
        let atr = average_true_range(series.bars(), 14).unwrap();
        assert!((atr - 2.0).abs() < 1e-9);
    }

    #[test]
    fn atr_uses_gap_to_previous_close() {
        let series = daily_series(&[10.0, 20.0]);
        let ranges = true_ranges(series.bars());
        // Second bar: high 21, previous close 10.
        assert_eq!(ranges, vec![2.0, 11.0]);
    }

    #[test]
    fn atr_of_empty_is_none() {
        assert!(average_true_range(&[], 14).is_none());
    }

    proptest! {
        #[test]
        fn sma_matches_naive_mean(
            values in prop::collection::vec(-1000.0f64..1000.0, 0..60),
            window in 1usize..30,
        ) {
            let sma = simple_moving_average(&values, window);
            prop_assert_eq!(sma.len(), values.len());
            for (i, got) in sma.iter().enumerate() {
                if i + 1 < window {
                    prop_assert!(got.is_none());
                } else {
                    let slice = &values[i + 1 - window..=i];
                    let expected = slice.iter().sum::<f64>() / window as f64;
                    prop_assert!((got.unwrap() - expected).abs() < 1e-6);
                }
            }
        }
    }
}
