//! Simple Moving Average indicator.
//!
//! Trailing arithmetic mean of closing prices over `period` bars, inclusive
//! of the current bar. Warmup: first (period-1) bars are invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_sma(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= period {
            sum -= bars[i - period].close;
        }

        let valid = period > 0 && i >= warmup;
        let value = if valid { sum / period as f64 } else { 0.0 };

        values.push(IndicatorPoint {
            time: bar.snapshot_time_utc,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
