//! Keltner Channel.
//!
//! Upper/lower = SMA(n) +/- mult * ATR(n). The multiplier is carried as an
//! integer x100 so the parameterisation stays hashable.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_keltner(bars: &[Bar], period: usize, mult_x100: u32) -> IndicatorSeries {
    let mult = mult_x100 as f64 / 100.0;
    let atr = calculate_atr(bars, period);
    let warmup = period.saturating_sub(1);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let valid = period > 0 && i >= warmup;
            let (upper, lower) = if valid {
                let sma = bars[i + 1 - period..=i]
                    .iter()
                    .map(|b| b.close)
                    .sum::<f64>()
                    / period as f64;
                let atr_value = atr.simple_at(i).unwrap_or(0.0);
                (sma + atr_value * mult, sma - atr_value * mult)
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
        indicator_type: IndicatorType::Keltner { period, mult_x100 },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_ohlc_bars;

    fn band_parts(series: &IndicatorSeries, i: usize) -> (f64, f64) {
        match series.values[i].value {
            IndicatorValue::Band { upper, lower } => (upper, lower),
            _ => panic!("expected Band value"),
        }
    }

    #[test]
    fn keltner_known_values() {
        // closes 9, 11 -> SMA(2) = 10; TRs 2.0, 3.0 -> ATR(2) = 2.5
        let bars = make_ohlc_bars(&[(10.0, 8.0, 9.0), (12.0, 9.0, 11.0)]);
        let series = calculate_keltner(&bars, 2, 100);

        assert!(!series.values[0].valid);
        let (upper, lower) = band_parts(&series, 1);
        assert!((upper - 12.5).abs() < 1e-12);
        assert!((lower - 7.5).abs() < 1e-12);
    }

    #[test]
    fn keltner_multiplier_scales_band() {
        let bars = make_ohlc_bars(&[(10.0, 8.0, 9.0), (12.0, 9.0, 11.0)]);
        let series = calculate_keltner(&bars, 2, 200);

        let (upper, lower) = band_parts(&series, 1);
        assert!((upper - 15.0).abs() < 1e-12);
        assert!((lower - 5.0).abs() < 1e-12);
    }

    #[test]
    fn keltner_band_contains_sma() {
        let rows: Vec<(f64, f64, f64)> = (0..10)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base + 2.0, base - 2.0, base)
            })
            .collect();
        let bars = make_ohlc_bars(&rows);
        let series = calculate_keltner(&bars, 3, 150);

        for i in 2..10 {
            let (upper, lower) = band_parts(&series, i);
            assert!(upper >= lower);
        }
    }
}
