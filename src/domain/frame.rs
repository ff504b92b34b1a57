//! Named indicator columns over a shared time index.
//!
//! Each indicator operation produces an [`IndicatorSeries`]; merging it into
//! a `MetricsFrame` projects the series into one or more named columns
//! aligned 1:1 with the bar index. Columns are insertion-ordered so report
//! output is stable.

use indexmap::IndexMap;

use crate::domain::error::RobofundError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};

/// One named column: sparse floats (warm-up gaps are `None`) or flags.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<Option<f64>>),
    Flag(Vec<bool>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Flag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsFrame {
    len: usize,
    columns: IndexMap<String, Column>,
}

impl MetricsFrame {
    pub fn new(len: usize) -> Self {
        MetricsFrame {
            len,
            columns: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn float_column(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.columns.get(name) {
            Some(Column::Float(v)) => Some(v),
            _ => None,
        }
    }

    pub fn flag_column(&self, name: &str) -> Option<&[bool]> {
        match self.columns.get(name) {
            Some(Column::Flag(v)) => Some(v),
            _ => None,
        }
    }

    /// Require a float column, surfacing a missing dependency as an error.
    pub fn require_float(&self, name: &str) -> Result<&[Option<f64>], RobofundError> {
        self.float_column(name)
            .ok_or_else(|| RobofundError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Insert a float column directly. Length must match the frame.
    pub fn insert_float(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), RobofundError> {
        if values.len() != self.len {
            return Err(RobofundError::ColumnLengthMismatch {
                column: values.len(),
                bars: self.len,
            });
        }
        self.columns.insert(name.into(), Column::Float(values));
        Ok(())
    }

    /// Merge an indicator series into the frame under its standard column
    /// names. Replaces any previous column of the same name.
    pub fn insert_series(&mut self, series: &IndicatorSeries) -> Result<(), RobofundError> {
        if series.values.len() != self.len {
            return Err(RobofundError::ColumnLengthMismatch {
                column: series.values.len(),
                bars: self.len,
            });
        }

        match &series.indicator_type {
            IndicatorType::Sma(n) => self.project_simple(series, format!("SMA_{}", n)),
            IndicatorType::Ema(n) => self.project_simple(series, format!("EMA_{}", n)),
            IndicatorType::Rsi(_) => self.project_simple(series, "RSI".to_string()),
            IndicatorType::AwesomeOscillator { .. } => {
                self.project_simple(series, "AWS".to_string())
            }
            IndicatorType::Macd { fast, slow, .. } => {
                let line = self.extract(series, |v| match v {
                    IndicatorValue::Macd { line, .. } => Some(*line),
                    _ => None,
                });
                let signal = self.extract(series, |v| match v {
                    IndicatorValue::Macd { signal, .. } => Some(*signal),
                    _ => None,
                });
                let histogram = self.extract(series, |v| match v {
                    IndicatorValue::Macd { histogram, .. } => Some(*histogram),
                    _ => None,
                });
                self.columns
                    .insert(format!("MACD_{}_{}", fast, slow), Column::Float(line));
                self.columns.insert(
                    format!("MACD_SIGNAL_{}_{}", fast, slow),
                    Column::Float(signal),
                );
                self.columns.insert(
                    format!("MACD_HIST_{}_{}", fast, slow),
                    Column::Float(histogram),
                );
            }
            IndicatorType::WilliamsR(n) => {
                self.project_simple(series, format!("WILLIAMS_R_{}", n))
            }
            IndicatorType::StochasticK(n) => self.project_simple(series, format!("STOCH_K_{}", n)),
            IndicatorType::StochasticD { k_period, .. } => {
                self.project_simple(series, format!("STOCH_D_{}", k_period))
            }
            IndicatorType::TrueRange => self.project_simple(series, "tr".to_string()),
            IndicatorType::Atr(_) => self.project_simple(series, "atr".to_string()),
            IndicatorType::Adx(_) => self.project_simple(series, "adx".to_string()),
            IndicatorType::ParabolicSar => {
                let level = self.extract(series, |v| match v {
                    IndicatorValue::Sar { level, .. } => Some(*level),
                    _ => None,
                });
                let uptrend: Vec<bool> = series
                    .values
                    .iter()
                    .map(|p| {
                        p.valid
                            && matches!(
                                p.value,
                                IndicatorValue::Sar { uptrend: true, .. }
                            )
                    })
                    .collect();
                self.columns.insert("sar".to_string(), Column::Float(level));
                self.columns
                    .insert("sar_trend_up".to_string(), Column::Flag(uptrend));
            }
            IndicatorType::LinearRegression(_) => {
                self.project_simple(series, "linear_regression".to_string())
            }
            IndicatorType::Keltner { .. } => self.project_band(series, "upper_kc", "lower_kc"),
            IndicatorType::Bollinger { .. } => self.project_band(series, "upper_bb", "lower_bb"),
            IndicatorType::Squeeze => {
                let flags: Vec<bool> = series
                    .values
                    .iter()
                    .map(|p| p.valid && matches!(p.value, IndicatorValue::Flag(true)))
                    .collect();
                self.columns
                    .insert("squeeze_on".to_string(), Column::Flag(flags));
            }
            IndicatorType::LowestLowStreak => {
                self.project_simple(series, "lowest_low_streak".to_string())
            }
            IndicatorType::HighestHighStreak => {
                self.project_simple(series, "highest_high_streak".to_string())
            }
            IndicatorType::Fibonacci => {
                let high = self.extract(series, |v| match v {
                    IndicatorValue::Fibonacci { high, .. } => Some(*high),
                    _ => None,
                });
                let low = self.extract(series, |v| match v {
                    IndicatorValue::Fibonacci { low, .. } => Some(*low),
                    _ => None,
                });
                self.columns
                    .insert("fib_high".to_string(), Column::Float(high));
                self.columns
                    .insert("fib_low".to_string(), Column::Float(low));
                for level in 0..4 {
                    let column = self.extract(series, |v| match v {
                        IndicatorValue::Fibonacci { levels, .. } => Some(levels[level]),
                        _ => None,
                    });
                    self.columns
                        .insert(format!("fib_{}", level + 1), Column::Float(column));
                }
            }
        }

        Ok(())
    }

    fn project_simple(&mut self, series: &IndicatorSeries, name: String) {
        let values = self.extract(series, |v| v.as_simple());
        self.columns.insert(name, Column::Float(values));
    }

    fn project_band(&mut self, series: &IndicatorSeries, upper_name: &str, lower_name: &str) {
        let upper = self.extract(series, |v| match v {
            IndicatorValue::Band { upper, .. } => Some(*upper),
            _ => None,
        });
        let lower = self.extract(series, |v| match v {
            IndicatorValue::Band { lower, .. } => Some(*lower),
            _ => None,
        });
        self.columns
            .insert(upper_name.to_string(), Column::Float(upper));
        self.columns
            .insert(lower_name.to_string(), Column::Float(lower));
    }

    fn extract<F>(&self, series: &IndicatorSeries, pick: F) -> Vec<Option<f64>>
    where
        F: Fn(&IndicatorValue) -> Option<f64>,
    {
        series
            .values
            .iter()
            .map(|p| if p.valid { pick(&p.value) } else { None })
            .collect()
    }
}
