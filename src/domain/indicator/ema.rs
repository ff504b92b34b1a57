//! Exponential Moving Average indicator.
//!
//! alpha = 2/(period+1), expanding weighted mean: early values are a
//! cumulative mean over the available history, converging to the recursive
//! form EMA[i] = C[i]*alpha + EMA[i-1]*(1-alpha) once the window fills.
//! Every bar from index 0 carries a value.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_ema(bars: &[Bar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema = ewm_mean(&closes, period);

    let values = bars
        .iter()
        .zip(ema)
        .map(|(bar, v)| IndicatorPoint {
            time: bar.snapshot_time_utc,
            valid: period > 0,
            value: IndicatorValue::Simple(v),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// Expanding exponentially weighted mean over an arbitrary value series.
/// Shared by EMA and the MACD signal line.
pub(crate) fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![0.0; values.len()];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut num = 0.0;
    let mut den = 0.0;

    values
        .iter()
        .map(|&v| {
            num = v + decay * num;
            den = 1.0 + decay * den;
            num / den
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    #[test]
    fn ema_first_value_is_first_price() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        assert!(series.values[0].valid);
        assert!((series.simple_at(0).unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn ema_expanding_weights() {
        // span 3 -> alpha 0.5; second value = (20 + 0.5*10) / (1 + 0.5)
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 3);

        let expected = (20.0 + 0.5 * 10.0) / 1.5;
        assert!((series.simple_at(1).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn ema_constant_input_is_the_constant() {
        let bars = make_bars(&[42.0; 8]);
        let series = calculate_ema(&bars, 5);

        for i in 0..8 {
            assert!((series.simple_at(i).unwrap() - 42.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_converges_to_constant() {
        // Step input: error against the new level shrinks monotonically.
        let mut closes = vec![0.0];
        closes.extend(std::iter::repeat(100.0).take(20));
        let bars = make_bars(&closes);
        let series = calculate_ema(&bars, 5);

        let mut prev_err = f64::INFINITY;
        for i in 1..bars.len() {
            let err = (series.simple_at(i).unwrap() - 100.0).abs();
            assert!(err < prev_err, "error did not shrink at bar {}", i);
            prev_err = err;
        }
    }

    #[test]
    fn ema_period_zero_is_all_invalid() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 0);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn ewm_mean_matches_recursive_form_late_in_series() {
        let values: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let ema = ewm_mean(&values, 10);

        // Once the weights have effectively filled, the expanding form obeys
        // the recursion EMA[i] = v*alpha + EMA[i-1]*(1-alpha).
        let alpha = 2.0 / 11.0;
        let recursive = values[199] * alpha + ema[198] * (1.0 - alpha);
        assert!((ema[199] - recursive).abs() < 1e-6);
    }
}
