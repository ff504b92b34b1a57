//! True Range and Average True Range.
//!
//! TR[0] = high - low; TR[i] = max(H-L, |H-prevC|, |L-prevC|)
//! ATR(n) = trailing n-bar simple mean of TR.
//! Warmup: TR is defined from bar 0, ATR from bar (n-1).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_true_range(bars: &[Bar]) -> IndicatorSeries {
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let tr = if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            };
            IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid: true,
                value: IndicatorValue::Simple(tr),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::TrueRange,
        values,
    }
}

pub fn calculate_atr(bars: &[Bar], period: usize) -> IndicatorSeries {
    let tr = calculate_true_range(bars);
    let warmup = period.saturating_sub(1);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let valid = period > 0 && i >= warmup;
            let value = if valid {
                (i + 1 - period..=i)
                    .filter_map(|j| tr.simple_at(j))
                    .sum::<f64>()
                    / period as f64
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
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}
