//! Fibonacci retracement grid.
//!
//! Stateful indicator expressed as an explicit fold. The state tracks the
//! rolling high/low anchors since the last reset and which side printed the
//! latest extreme. When the anchor range exceeds `threshold_pips * pip_size`
//! a new grid is seeded from the anchors via the golden-ratio recurrence
//!   level[i] = level[i-1] - (level[i-1] - level[i-2]) / 1.618
//! (seeds: low then high for an upward breakout, swapped for a downward
//! one), and range tracking restarts at the current bar.
//! The current grid and anchors are published on every bar.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const GOLDEN_RATIO: f64 = 1.618;
pub const GRID_LEVELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibParams {
    pub threshold_pips: f64,
    pub pip_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FibState {
    pub anchor_high: f64,
    pub anchor_low: f64,
    pub rising: bool,
    pub levels: [f64; GRID_LEVELS],
}

impl FibState {
    fn seed(bar: &Bar) -> Self {
        let rising = bar.close >= bar.open;
        FibState {
            anchor_high: bar.high,
            anchor_low: bar.low,
            rising,
            levels: golden_grid(bar.low, bar.high, rising),
        }
    }

    /// One transition: extend the anchors, then reset the grid if the range
    /// since the last reset has exceeded the threshold.
    pub fn update(&self, bar: &Bar, params: &FibParams) -> FibState {
        let mut next = self.clone();

        let new_high = bar.high > next.anchor_high;
        let new_low = bar.low < next.anchor_low;
        next.anchor_high = next.anchor_high.max(bar.high);
        next.anchor_low = next.anchor_low.min(bar.low);

        match (new_high, new_low) {
            (true, false) => next.rising = true,
            (false, true) => next.rising = false,
            (true, true) => next.rising = bar.close >= bar.open,
            (false, false) => {}
        }

        if next.anchor_high - next.anchor_low > params.threshold_pips * params.pip_size {
            next.levels = golden_grid(next.anchor_low, next.anchor_high, next.rising);
            next.anchor_high = bar.high;
            next.anchor_low = bar.low;
        }

        next
    }
}

/// Golden-ratio recurrence seeded from the retracement anchors.
fn golden_grid(low: f64, high: f64, rising: bool) -> [f64; GRID_LEVELS] {
    let (mut prev2, mut prev1) = if rising { (low, high) } else { (high, low) };

    let mut levels = [0.0; GRID_LEVELS];
    for level in levels.iter_mut() {
        let next = prev1 - (prev1 - prev2) / GOLDEN_RATIO;
        *level = next;
        prev2 = prev1;
        prev1 = next;
    }
    levels
}

pub fn calculate_fibonacci(bars: &[Bar], params: &FibParams) -> IndicatorSeries {
    let indicator_type = IndicatorType::Fibonacci;
    let mut values = Vec::with_capacity(bars.len());

    let mut state: Option<FibState> = None;
    for bar in bars {
        let next = match &state {
            None => FibState::seed(bar),
            Some(s) => s.update(bar, params),
        };

        values.push(IndicatorPoint {
            time: bar.snapshot_time_utc,
            valid: true,
            value: IndicatorValue::Fibonacci {
                high: next.anchor_high,
                low: next.anchor_low,
                levels: next.levels,
            },
        });
        state = Some(next);
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
