//! ADX (Average Directional Index).
//!
//! +DM = H - prevH, -DM = prevL - L, each clipped to >= 0.
//! DI+/- = 100 * mean(DM, n) / mean(TR, n)
//! DX = 100 * |DI+ - DI-| / (DI+ + DI-)
//! ADX = trailing n-bar mean of DX.
//!
//! Degenerate denominators are mapped, never propagated: a zero TR mean
//! yields DI = 0, and DI+ + DI- == 0 yields DX = 0.
//! Warmup: DX from bar n, ADX from bar (2n-1).

use crate::domain::bar::Bar;
use crate::domain::indicator::atr::calculate_true_range;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_adx(bars: &[Bar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Adx(period);
    if period == 0 {
        let values = bars
            .iter()
            .map(|bar| IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let tr = calculate_true_range(bars);

    // Directional movement; index 0 has no previous bar.
    let mut dm_plus = vec![0.0; bars.len()];
    let mut dm_minus = vec![0.0; bars.len()];
    for i in 1..bars.len() {
        dm_plus[i] = (bars[i].high - bars[i - 1].high).max(0.0);
        dm_minus[i] = (bars[i - 1].low - bars[i].low).max(0.0);
    }

    // DX needs n directional-movement values, the first of which is bar 1.
    let mut dx = vec![None; bars.len()];
    for i in period..bars.len() {
        let start = i + 1 - period;
        let tr_mean = (start..=i).filter_map(|j| tr.simple_at(j)).sum::<f64>() / period as f64;
        let dm_plus_mean = dm_plus[start..=i].iter().sum::<f64>() / period as f64;
        let dm_minus_mean = dm_minus[start..=i].iter().sum::<f64>() / period as f64;

        let (di_plus, di_minus) = if tr_mean == 0.0 {
            (0.0, 0.0)
        } else {
            (
                100.0 * dm_plus_mean / tr_mean,
                100.0 * dm_minus_mean / tr_mean,
            )
        };

        let di_sum = di_plus + di_minus;
        dx[i] = Some(if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (di_plus - di_minus).abs() / di_sum
        });
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let valid = i + 1 >= 2 * period && (i + 1 - period..=i).all(|j| dx[j].is_some());
            let value = if valid {
                (i + 1 - period..=i).filter_map(|j| dx[j]).sum::<f64>() / period as f64
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
        indicator_type,
        values,
    }
}
