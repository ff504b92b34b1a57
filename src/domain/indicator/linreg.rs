//! Rolling linear-regression slope projection.
//!
//! The regressed value is the close detrended against the window midline:
//!   v = C - ((HighestHigh_n + LowestLow_n)/2 + SMA_n)/2
//! A least-squares line is fitted to the trailing n values of v against the
//! index 0..n-1 and projected to the final position:
//!   slope * (n-1) + intercept
//! scaled by 1000 and rounded to 2 decimals.
//! Warmup: v needs (n-1) bars, the fit a further (n-1) -> first valid bar
//! is (2n-2).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_PERIOD: usize = 21;

pub fn calculate_linear_regression(bars: &[Bar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::LinearRegression(period);
    let n = bars.len();

    let mut transformed = vec![None; n];
    if period > 0 {
        for i in (period - 1)..n {
            let window = &bars[i + 1 - period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let sma = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
            let midline = (highest + lowest) / 2.0;
            transformed[i] = Some(bars[i].close - (midline + sma) / 2.0);
        }
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let valid = period > 0
                && i + 1 >= 2 * period - 1
                && (i + 1 - period..=i).all(|j| transformed[j].is_some());

            let value = if valid {
                let window: Vec<f64> = (i + 1 - period..=i)
                    .filter_map(|j| transformed[j])
                    .collect();
                let (slope, intercept) = least_squares(&window);
                let projected = slope * (period as f64 - 1.0) + intercept;
                (projected * 1000.0 * 100.0).round() / 100.0
            } else {
                0.0
            };

            IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid,
                value: IndicatorValue::Simple(value),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// Ordinary least squares of `values` against the index 0..len-1.
fn least_squares(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|x| x as f64).sum();
    let sum_xx: f64 = (0..values.len()).map(|x| (x * x) as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values
        .iter()
        .enumerate()
        .map(|(x, y)| x as f64 * y)
        .sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return (0.0, sum_y / n);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    #[test]
    fn linreg_warmup() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let series = calculate_linear_regression(&bars, 3);

        // first valid bar is 2n-2 = 4
        for i in 0..4 {
            assert!(!series.values[i].valid, "bar {} should be invalid", i);
        }
        assert!(series.values[4].valid);
        assert!(series.values[5].valid);
    }

    #[test]
    fn linreg_constant_series_is_zero() {
        let bars = make_bars(&[10.0; 10]);
        let series = calculate_linear_regression(&bars, 3);

        for i in 4..10 {
            assert!((series.simple_at(i).unwrap() - 0.0).abs() < 1e-12);
        }
    }

    #[test]
    fn linreg_linear_series_projects_constant_offset() {
        // For close = t (flat bars), the detrended value is constantly 1:
        // midline = t-1, sma = t-1 -> v = t - (t-1) = 1, so the projection
        // is 1 and the scaled output is 1000.
        let closes: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let bars = make_bars(&closes);
        let series = calculate_linear_regression(&bars, 3);

        for i in 4..12 {
            assert!((series.simple_at(i).unwrap() - 1000.0).abs() < 1e-9);
        }
    }

    #[test]
    fn least_squares_known_fit() {
        // y = 2x + 1
        let (slope, intercept) = least_squares(&[1.0, 3.0, 5.0, 7.0]);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn least_squares_single_point() {
        let (slope, intercept) = least_squares(&[4.0]);
        assert!((slope - 0.0).abs() < 1e-12);
        assert!((intercept - 4.0).abs() < 1e-12);
    }
}
