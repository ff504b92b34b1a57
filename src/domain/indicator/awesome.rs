//! Awesome Oscillator.
//!
//! Difference of two simple moving averages of the bar midpoint (H+L)/2,
//! short window minus long window, scaled by 10,000 and rounded to 2
//! decimals. Defaults: short=4, long=64.
//! Warmup: first (long-1) bars are invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_SHORT: usize = 4;
pub const DEFAULT_LONG: usize = 64;

pub fn calculate_awesome_oscillator(bars: &[Bar], short: usize, long: usize) -> IndicatorSeries {
    let mids: Vec<f64> = bars.iter().map(|b| b.midpoint()).collect();
    let warmup = short.max(long).saturating_sub(1);

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let valid = short > 0 && long > 0 && i >= warmup;

        let value = if valid {
            let short_mean = mean_of_trailing(&mids, i, short);
            let long_mean = mean_of_trailing(&mids, i, long);
            ((short_mean - long_mean) * 10_000.0 * 100.0).round() / 100.0
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
        indicator_type: IndicatorType::AwesomeOscillator { short, long },
        values,
    }
}

fn mean_of_trailing(values: &[f64], end: usize, window: usize) -> f64 {
    let start = end + 1 - window;
    values[start..=end].iter().sum::<f64>() / window as f64
}
