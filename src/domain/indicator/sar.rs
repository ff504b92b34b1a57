//! Parabolic SAR (stop-and-reverse).
//!
//! Stateful recursive trend follower, expressed as an explicit fold over the
//! bar sequence. State per bar: current SAR level, trend direction, and
//! acceleration factor.
//!
//! Transitions:
//! - price breaching the SAR against the trend flips the trend, resets the
//!   SAR to the current bar's opposite extreme and the acceleration factor
//!   to `initial_af`;
//! - otherwise the SAR steps toward price by `af * (extreme - sar)` where
//!   the extreme is the current low in an uptrend and the current high in a
//!   downtrend, and the factor ratchets by `initial_af` (capped at `max_af`)
//!   whenever a new same-direction extreme prints.
//!
//! The first bar's direction is bootstrapped by comparing bar 0 and bar 1
//! highs; fewer than two bars yields an all-invalid series.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarParams {
    pub initial_af: f64,
    pub max_af: f64,
}

impl Default for SarParams {
    fn default() -> Self {
        SarParams {
            initial_af: 0.02,
            max_af: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarState {
    pub sar: f64,
    pub uptrend: bool,
    pub af: f64,
}

impl SarState {
    /// Bootstrap from the first two bars.
    fn bootstrap(first: &Bar, second: &Bar, params: &SarParams) -> Self {
        if second.high > first.high {
            SarState {
                sar: first.low,
                uptrend: true,
                af: params.initial_af,
            }
        } else {
            SarState {
                sar: first.high,
                uptrend: false,
                af: params.initial_af,
            }
        }
    }

    /// One transition of the SAR state machine.
    pub fn step(&self, prev: &Bar, bar: &Bar, params: &SarParams) -> SarState {
        if self.uptrend {
            if bar.low < self.sar {
                SarState {
                    sar: bar.high,
                    uptrend: false,
                    af: params.initial_af,
                }
            } else {
                let af = if bar.high > prev.high {
                    (self.af + params.initial_af).min(params.max_af)
                } else {
                    self.af
                };
                SarState {
                    sar: self.sar + self.af * (bar.low - self.sar),
                    uptrend: true,
                    af,
                }
            }
        } else if bar.high > self.sar {
            SarState {
                sar: bar.low,
                uptrend: true,
                af: params.initial_af,
            }
        } else {
            let af = if bar.low < prev.low {
                (self.af + params.initial_af).min(params.max_af)
            } else {
                self.af
            };
            SarState {
                sar: self.sar - self.af * (self.sar - bar.high),
                uptrend: false,
                af,
            }
        }
    }
}

pub fn calculate_parabolic_sar(bars: &[Bar], params: &SarParams) -> IndicatorSeries {
    let indicator_type = IndicatorType::ParabolicSar;

    if bars.len() < 2 {
        let values = bars
            .iter()
            .map(|bar| IndicatorPoint {
                time: bar.snapshot_time_utc,
                valid: false,
                value: IndicatorValue::Sar {
                    level: 0.0,
                    uptrend: false,
                },
            })
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let mut state = SarState::bootstrap(&bars[0], &bars[1], params);
    let mut values = Vec::with_capacity(bars.len());
    values.push(IndicatorPoint {
        time: bars[0].snapshot_time_utc,
        valid: true,
        value: IndicatorValue::Sar {
            level: state.sar,
            uptrend: state.uptrend,
        },
    });

    for i in 1..bars.len() {
        state = state.step(&bars[i - 1], &bars[i], params);
        values.push(IndicatorPoint {
            time: bars[i].snapshot_time_utc,
            valid: true,
            value: IndicatorValue::Sar {
                level: state.sar,
                uptrend: state.uptrend,
            },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
