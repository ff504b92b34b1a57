//! Technical indicator implementations.
//!
//! Every indicator is a pure function `&[Bar] x params -> IndicatorSeries`,
//! aligned 1:1 with the input bars. Warm-up positions where a rolling or
//! recursive computation lacks history carry `valid: false` ("no value",
//! never zero or NaN). No indicator reorders or drops rows, and none assumes
//! another has already been computed except the declared dependencies
//! (MACD on EMA, Keltner/Squeeze on ATR, ADX on true range).

pub mod adx;
pub mod atr;
pub mod awesome;
pub mod bollinger;
pub mod ema;
pub mod fibonacci;
pub mod keltner;
pub mod linreg;
pub mod macd;
pub mod rsi;
pub mod sar;
pub mod sma;
pub mod squeeze;
pub mod stochastic;
pub mod streak;
pub mod williams_r;

pub use adx::calculate_adx;
pub use atr::{calculate_atr, calculate_true_range};
pub use awesome::calculate_awesome_oscillator;
pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use fibonacci::{calculate_fibonacci, FibParams};
pub use keltner::calculate_keltner;
pub use linreg::calculate_linear_regression;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sar::{calculate_parabolic_sar, SarParams};
pub use sma::calculate_sma;
pub use squeeze::calculate_squeeze;
pub use stochastic::{calculate_stochastic_d, calculate_stochastic_k};
pub use streak::{calculate_highest_high_streak, calculate_lowest_low_streak};
pub use williams_r::calculate_williams_r;

use chrono::{DateTime, Utc};
use std::fmt;

/// A single point in an indicator time series.
#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub time: DateTime<Utc>,
    pub valid: bool,
    pub value: IndicatorValue,
}

/// Output shape of one indicator at one bar.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Flag(bool),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Band {
        upper: f64,
        lower: f64,
    },
    Sar {
        level: f64,
        uptrend: bool,
    },
    Fibonacci {
        high: f64,
        low: f64,
        levels: [f64; 4],
    },
}

impl IndicatorValue {
    /// The scalar payload of a `Simple` point, if that is the shape.
    pub fn as_simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

/// Indicator identity plus parameters. Doubles as the column-naming key when
/// a series is merged into a [`MetricsFrame`](crate::domain::frame::MetricsFrame).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    AwesomeOscillator { short: usize, long: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    WilliamsR(usize),
    StochasticK(usize),
    StochasticD { k_period: usize, d_period: usize },
    TrueRange,
    Atr(usize),
    Adx(usize),
    ParabolicSar,
    LinearRegression(usize),
    Keltner { period: usize, mult_x100: u32 },
    Bollinger { period: usize, mult_x100: u32 },
    Squeeze,
    LowestLowStreak,
    HighestHighStreak,
    Fibonacci,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::AwesomeOscillator { short, long } => {
                write!(f, "AWESOME({},{})", short, long)
            }
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::WilliamsR(period) => write!(f, "WILLIAMS_R({})", period),
            IndicatorType::StochasticK(period) => write!(f, "STOCH_K({})", period),
            IndicatorType::StochasticD { k_period, d_period } => {
                write!(f, "STOCH_D({},{})", k_period, d_period)
            }
            IndicatorType::TrueRange => write!(f, "TR"),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::ParabolicSar => write!(f, "SAR"),
            IndicatorType::LinearRegression(period) => write!(f, "LINREG({})", period),
            IndicatorType::Keltner { period, mult_x100 } => {
                write!(f, "KELTNER({},{})", period, *mult_x100 as f64 / 100.0)
            }
            IndicatorType::Bollinger { period, mult_x100 } => {
                write!(f, "BOLLINGER({},{})", period, *mult_x100 as f64 / 100.0)
            }
            IndicatorType::Squeeze => write!(f, "SQUEEZE"),
            IndicatorType::LowestLowStreak => write!(f, "LOWEST_LOW_STREAK"),
            IndicatorType::HighestHighStreak => write!(f, "HIGHEST_HIGH_STREAK"),
            IndicatorType::Fibonacci => write!(f, "FIBONACCI"),
        }
    }
}

/// A time series of indicator values.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Scalar value at `index` when the point is valid and `Simple`-shaped.
    pub fn simple_at(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .and_then(|p| p.value.as_simple())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
        assert_eq!(
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
            .to_string(),
            "MACD(12,26,9)"
        );
        assert_eq!(
            IndicatorType::Bollinger {
                period: 20,
                mult_x100: 200
            }
            .to_string(),
            "BOLLINGER(20,2)"
        );
        assert_eq!(IndicatorType::ParabolicSar.to_string(), "SAR");
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Sma(12), "sma12");
        map.insert(IndicatorType::Ema(12), "ema12");

        assert_eq!(map.get(&IndicatorType::Sma(12)), Some(&"sma12"));
        assert_eq!(map.get(&IndicatorType::Ema(12)), Some(&"ema12"));
        assert_eq!(map.get(&IndicatorType::Sma(25)), None);
    }

    #[test]
    fn as_simple() {
        assert_eq!(IndicatorValue::Simple(1.5).as_simple(), Some(1.5));
        assert_eq!(IndicatorValue::Flag(true).as_simple(), None);
    }
}
