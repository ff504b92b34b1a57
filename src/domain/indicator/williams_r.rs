//! Williams %R oscillator.
//!
//! %R = (HighestHigh_n - C) / (HighestHigh_n - LowestLow_n) * -100
//! Range [-100, 0]. A zero high-low range maps to the midpoint -50 rather
//! than dividing by zero.
//! Warmup: first (period-1) bars are invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_williams_r(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i >= warmup;

        let value = if valid {
            let window = &bars[i + 1 - period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let range = highest - lowest;

            if range == 0.0 {
                -50.0
            } else {
                (highest - bar.close) / range * -100.0
            }
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            time: bar.snapshot_time_utc,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::WilliamsR(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::{make_bars, make_ohlc_bars};

    #[test]
    fn williams_known_value() {
        // window: highs 10,12 lows 8,9 close 11 -> (12-11)/(12-8)*-100 = -25
        let bars = make_ohlc_bars(&[(10.0, 8.0, 9.0), (12.0, 9.0, 11.0)]);
        let series = calculate_williams_r(&bars, 2);

        assert!(!series.values[0].valid);
        assert!((series.simple_at(1).unwrap() - (-25.0)).abs() < 1e-12);
    }

    #[test]
    fn williams_close_at_high_is_zero() {
        let bars = make_ohlc_bars(&[(10.0, 8.0, 9.0), (12.0, 9.0, 12.0)]);
        let series = calculate_williams_r(&bars, 2);
        assert!((series.simple_at(1).unwrap() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn williams_close_at_low_is_minus_100() {
        let bars = make_ohlc_bars(&[(10.0, 8.0, 9.0), (12.0, 8.0, 8.0)]);
        let series = calculate_williams_r(&bars, 2);
        assert!((series.simple_at(1).unwrap() - (-100.0)).abs() < 1e-12);
    }

    #[test]
    fn williams_zero_range_is_midpoint() {
        let bars = make_bars(&[10.0, 10.0, 10.0]);
        let series = calculate_williams_r(&bars, 2);
        assert!((series.simple_at(2).unwrap() - (-50.0)).abs() < 1e-12);
    }

    #[test]
    fn williams_in_range() {
        let rows: Vec<(f64, f64, f64)> = (0..30)
            .map(|i| {
                let base = 100.0 + ((i * 5) % 13) as f64;
                (base + 2.0, base - 2.0, base + ((i % 3) as f64 - 1.0))
            })
            .collect();
        let bars = make_ohlc_bars(&rows);
        let series = calculate_williams_r(&bars, 14);

        for i in 0..30 {
            if let Some(r) = series.simple_at(i) {
                assert!((-100.0..=0.0).contains(&r), "%R {} out of range", r);
            }
        }
    }
}
