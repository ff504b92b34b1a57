//! Stochastic oscillator.
//!
//! %K = (C - LowestLow_n) / (HighestHigh_n - LowestLow_n) * 100
//! %D = d_period-bar SMA of %K (default 3)
//! Range [0, 100]. A zero high-low range maps %K to the midpoint 50.
//! Warmup: %K invalid for the first (k_period-1) bars, %D for a further
//! (d_period-1).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic_k(bars: &[Bar], period: usize) -> IndicatorSeries {
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
                50.0
            } else {
                (bar.close - lowest) / range * 100.0
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
        indicator_type: IndicatorType::StochasticK(period),
        values,
    }
}

/// %D: trailing `d_period`-bar mean of %K.
pub fn calculate_stochastic_d(bars: &[Bar], k_period: usize, d_period: usize) -> IndicatorSeries {
    let k = calculate_stochastic_k(bars, k_period);
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let window_start = (i + 1).checked_sub(d_period);
        let window_valid = d_period > 0
            && window_start.is_some_and(|start| {
                (start..=i).all(|j| k.values.get(j).map(|p| p.valid).unwrap_or(false))
            });

        let value = if window_valid {
            let start = window_start.unwrap_or(0);
            (start..=i)
                .filter_map(|j| k.simple_at(j))
                .sum::<f64>()
                / d_period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            time: bar.snapshot_time_utc,
            valid: window_valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::StochasticD { k_period, d_period },
        values,
    }
}
