//! RSI (Relative Strength Index) indicator.
//!
//! Trailing simple means of positive and negative close-to-close changes
//! over `period` bars:
//!   RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! avg_loss == 0 maps to RSI = 100; the division is never allowed to
//! propagate as NaN/inf.
//! Warmup: first `period` bars are invalid (a change needs a prior close).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_rsi(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i >= period;

        let value = if valid {
            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            for j in (i - period + 1)..=i {
                let change = bars[j].close - bars[j - 1].close;
                if change > 0.0 {
                    gain_sum += change;
                } else {
                    loss_sum -= change;
                }
            }

            let avg_gain = gain_sum / period as f64;
            let avg_loss = loss_sum / period as f64;

            if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
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
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
