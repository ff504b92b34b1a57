//! Streak counters.
//!
//! Running 1-based count of consecutive bars failing to improve on the prior
//! bar's extreme. `lowest_low_streak` resets to 1 whenever the low prints
//! above the previous low; `highest_high_streak` resets whenever the high
//! prints below the previous high. Defined from bar 0.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_lowest_low_streak(bars: &[Bar]) -> IndicatorSeries {
    let values = streak_values(bars, |prev, bar| bar.low > prev.low);
    IndicatorSeries {
        indicator_type: IndicatorType::LowestLowStreak,
        values,
    }
}

pub fn calculate_highest_high_streak(bars: &[Bar]) -> IndicatorSeries {
    let values = streak_values(bars, |prev, bar| bar.high < prev.high);
    IndicatorSeries {
        indicator_type: IndicatorType::HighestHighStreak,
        values,
    }
}

fn streak_values<F>(bars: &[Bar], resets: F) -> Vec<IndicatorPoint>
where
    F: Fn(&Bar, &Bar) -> bool,
{
    let mut count = 0u32;
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            count = if i == 0 || resets(&bars[i - 1], bar) {
                1
            } else {
                count + 1
            };
            IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid: true,
                value: IndicatorValue::Simple(count as f64),
            }
        })
        .collect()
}
