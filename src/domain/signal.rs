//! Per-bar trade signal annotation.
//!
//! Entry/exit flags and stop/limit levels are produced by an external
//! strategy layer; the simulator only consumes them. All vectors are aligned
//! 1:1 with the bar series.

use crate::domain::error::RobofundError;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub entry_long: Vec<bool>,
    pub entry_short: Vec<bool>,
    pub exit_long: Vec<bool>,
    pub exit_short: Vec<bool>,
    pub long_stop: Vec<Option<f64>>,
    pub short_stop: Vec<Option<f64>>,
    pub long_profit_take: Vec<Option<f64>>,
    pub short_profit_take: Vec<Option<f64>>,
}

impl SignalSeries {
    /// All-quiet signals: no entries, no exits, no levels.
    pub fn empty(len: usize) -> Self {
        SignalSeries {
            entry_long: vec![false; len],
            entry_short: vec![false; len],
            exit_long: vec![false; len],
            exit_short: vec![false; len],
            long_stop: vec![None; len],
            short_stop: vec![None; len],
            long_profit_take: vec![None; len],
            short_profit_take: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.entry_long.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_long.is_empty()
    }

    /// Check 1:1 alignment against a bar count.
    pub fn validate_len(&self, bars: usize) -> Result<(), RobofundError> {
        let lens = [
            self.entry_long.len(),
            self.entry_short.len(),
            self.exit_long.len(),
            self.exit_short.len(),
            self.long_stop.len(),
            self.short_stop.len(),
            self.long_profit_take.len(),
            self.short_profit_take.len(),
        ];

        for len in lens {
            if len != bars {
                return Err(RobofundError::SignalLengthMismatch { signals: len, bars });
            }
        }
        Ok(())
    }
}
