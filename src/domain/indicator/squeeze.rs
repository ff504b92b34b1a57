//! Squeeze flag.
//!
//! True when the Bollinger band sits fully inside the Keltner channel:
//!   upper_bb < upper_kc && lower_bb > lower_kc
//! Valid once both bands are valid.

use crate::domain::bar::Bar;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::keltner::calculate_keltner;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_squeeze(
    bars: &[Bar],
    bb_period: usize,
    bb_mult_x100: u32,
    kc_period: usize,
    kc_mult_x100: u32,
) -> IndicatorSeries {
    let bb = calculate_bollinger(bars, bb_period, bb_mult_x100);
    let kc = calculate_keltner(bars, kc_period, kc_mult_x100);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let bands = match (&bb.values[i], &kc.values[i]) {
                (bb_point, kc_point) if bb_point.valid && kc_point.valid => {
                    match (&bb_point.value, &kc_point.value) {
                        (
                            IndicatorValue::Band {
                                upper: upper_bb,
                                lower: lower_bb,
                            },
                            IndicatorValue::Band {
                                upper: upper_kc,
                                lower: lower_kc,
                            },
                        ) => Some(upper_bb < upper_kc && lower_bb > lower_kc),
                        _ => None,
                    }
                }
                _ => None,
            };

            IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid: bands.is_some(),
                value: IndicatorValue::Flag(bands.unwrap_or(false)),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Squeeze,
        values,
    }
}
