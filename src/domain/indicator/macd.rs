//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the MACD line
//! Histogram = MACD Line - Signal Line
//!
//! EMAs use the expanding weighting of [`ema`](super::ema), so the series is
//! defined from bar 0. Parameter pairs 12/26 and 50/80 (signal span 9) are
//! both part of the standard catalogue, as independent named series.

use crate::domain::bar::Bar;
use crate::domain::indicator::ema::ewm_mean;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_span,
    };

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ewm_mean(&closes, fast);
    let ema_slow = ewm_mean(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ewm_mean(&macd_line, signal_span);

    let valid = fast > 0 && slow > 0 && signal_span > 0;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            time: bar.snapshot_time_utc,
            valid,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    fn macd_parts(series: &IndicatorSeries, i: usize) -> (f64, f64, f64) {
        match series.values[i].value {
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => (line, signal, histogram),
            _ => panic!("expected Macd value"),
        }
    }

    #[test]
    fn macd_constant_input_is_zero() {
        let bars = make_bars(&[50.0; 30]);
        let series = calculate_macd(&bars, 12, 26, 9);

        for i in 0..30 {
            let (line, signal, histogram) = macd_parts(&series, i);
            assert!(line.abs() < 1e-12);
            assert!(signal.abs() < 1e-12);
            assert!(histogram.abs() < 1e-12);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let series = calculate_macd(&bars, 12, 26, 9);

        let (line, _, _) = macd_parts(&series, 59);
        assert!(line > 0.0, "fast EMA should sit above slow EMA in uptrend");
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 3) % 7) as f64).collect();
        let bars = make_bars(&closes);
        let series = calculate_macd(&bars, 12, 26, 9);

        for i in 0..40 {
            let (line, signal, histogram) = macd_parts(&series, i);
            assert!((histogram - (line - signal)).abs() < 1e-12);
        }
    }

    #[test]
    fn macd_first_bar_is_zero() {
        // Both EMAs equal the first close at bar 0.
        let bars = make_bars(&[123.0, 124.0]);
        let series = calculate_macd(&bars, 12, 26, 9);

        let (line, signal, _) = macd_parts(&series, 0);
        assert!(line.abs() < 1e-12);
        assert!(signal.abs() < 1e-12);
    }

    #[test]
    fn macd_zero_parameter_is_all_invalid() {
        let bars = make_bars(&[1.0, 2.0]);
        let series = calculate_macd(&bars, 0, 26, 9);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
