//! Bollinger Bands.
//!
//! Upper/lower = SMA(n) +/- mult * stdev(n) where stdev is the population
//! standard deviation (divides by N, not N-1). The multiplier is carried as
//! an integer x100 so the parameterisation stays hashable.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_bollinger(bars: &[Bar], period: usize, mult_x100: u32) -> IndicatorSeries {
    let mult = mult_x100 as f64 / 100.0;
    let warmup = period.saturating_sub(1);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let valid = period > 0 && i >= warmup;
            let (upper, lower) = if valid {
                let window = &bars[i + 1 - period..=i];
                let sma = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
                let variance = window
                    .iter()
                    .map(|b| {
                        let diff = b.close - sma;
                        diff * diff
                    })
                    .sum::<f64>()
                    / period as f64;
                let stdev = variance.sqrt();
                (sma + mult * stdev, sma - mult * stdev)
            } else {
                (0.0, 0.0)
            };

            IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid,
                value: IndicatorValue::Band { upper, lower },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger { period, mult_x100 },
        values,
    }
}
