//! Indicator engine facade.
//!
//! `FundMetrics` owns a validated bar series plus the named indicator
//! columns computed over it. Construction computes the standard catalogue;
//! `set_*` operations add or refresh further columns. Stop/limit setters
//! populate the per-bar signal levels consumed by the simulator; the
//! entry/exit flags themselves come from an external strategy layer.

use crate::domain::bar::{Bar, BarSeries};
use crate::domain::error::RobofundError;
use crate::domain::frame::MetricsFrame;
use crate::domain::indicator::{
    calculate_adx, calculate_atr, calculate_awesome_oscillator, calculate_bollinger,
    calculate_ema, calculate_fibonacci, calculate_highest_high_streak, calculate_keltner,
    calculate_linear_regression, calculate_lowest_low_streak, calculate_macd,
    calculate_parabolic_sar, calculate_rsi, calculate_sma, calculate_squeeze,
    calculate_stochastic_d, calculate_stochastic_k, calculate_true_range, calculate_williams_r,
    FibParams, SarParams,
};
use crate::domain::indicator::awesome::{DEFAULT_LONG, DEFAULT_SHORT};
use crate::domain::indicator::macd::DEFAULT_SIGNAL;
use crate::domain::indicator::stochastic::DEFAULT_D_PERIOD;
use crate::domain::signal::SignalSeries;
use crate::domain::trade::Direction;

#[derive(Debug, Clone)]
pub struct FundMetrics {
    series: BarSeries,
    pub frame: MetricsFrame,
    pub signals: SignalSeries,
}

impl FundMetrics {
    /// Build the engine and compute the standard catalogue: SMA 12/25/50/80,
    /// EMA 12/26/50/80, RSI(14), Awesome Oscillator(4,64), MACD 12/26 and
    /// 50/80, Williams %R(14), Stochastic %K/%D(14,3), streak counters and
    /// true-range ATR(14).
    pub fn new(series: BarSeries) -> Result<Self, RobofundError> {
        let len = series.len();
        let mut metrics = FundMetrics {
            series,
            frame: MetricsFrame::new(len),
            signals: SignalSeries::empty(len),
        };

        for n in [12, 25, 50, 80] {
            metrics.set_sma(n)?;
        }
        for n in [12, 26, 50, 80] {
            metrics.set_ema(n)?;
        }
        metrics.set_rsi(14)?;
        metrics.set_awesome_oscillator(DEFAULT_SHORT, DEFAULT_LONG)?;
        metrics.set_macd(12, 26)?;
        metrics.set_macd(50, 80)?;
        metrics.set_williams_r(14)?;
        metrics.set_stochastic(14, DEFAULT_D_PERIOD)?;
        metrics.set_streaks()?;
        metrics.set_atr(14)?;

        Ok(metrics)
    }

    pub fn bars(&self) -> &[Bar] {
        self.series.bars()
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn set_sma(&mut self, length: usize) -> Result<(), RobofundError> {
        let series = calculate_sma(self.series.bars(), length);
        self.frame.insert_series(&series)
    }

    pub fn set_ema(&mut self, length: usize) -> Result<(), RobofundError> {
        let series = calculate_ema(self.series.bars(), length);
        self.frame.insert_series(&series)
    }

    pub fn set_rsi(&mut self, length: usize) -> Result<(), RobofundError> {
        let series = calculate_rsi(self.series.bars(), length);
        self.frame.insert_series(&series)
    }

    pub fn set_awesome_oscillator(
        &mut self,
        short: usize,
        long: usize,
    ) -> Result<(), RobofundError> {
        let series = calculate_awesome_oscillator(self.series.bars(), short, long);
        self.frame.insert_series(&series)
    }

    pub fn set_macd(&mut self, fast: usize, slow: usize) -> Result<(), RobofundError> {
        let series = calculate_macd(self.series.bars(), fast, slow, DEFAULT_SIGNAL);
        self.frame.insert_series(&series)
    }

    pub fn set_williams_r(&mut self, length: usize) -> Result<(), RobofundError> {
        let series = calculate_williams_r(self.series.bars(), length);
        self.frame.insert_series(&series)
    }

    pub fn set_stochastic(
        &mut self,
        length_k: usize,
        length_d: usize,
    ) -> Result<(), RobofundError> {
        let series = calculate_stochastic_k(self.series.bars(), length_k);
        self.frame.insert_series(&series)?;
        let series = calculate_stochastic_d(self.series.bars(), length_k, length_d);
        self.frame.insert_series(&series)
    }

    pub fn set_streaks(&mut self) -> Result<(), RobofundError> {
        let series = calculate_lowest_low_streak(self.series.bars());
        self.frame.insert_series(&series)?;
        let series = calculate_highest_high_streak(self.series.bars());
        self.frame.insert_series(&series)
    }

    pub fn set_true_range(&mut self) -> Result<(), RobofundError> {
        let series = calculate_true_range(self.series.bars());
        self.frame.insert_series(&series)
    }

    pub fn set_atr(&mut self, length: usize) -> Result<(), RobofundError> {
        self.set_true_range()?;
        let series = calculate_atr(self.series.bars(), length);
        self.frame.insert_series(&series)
    }

    pub fn set_adx(&mut self, period: usize) -> Result<(), RobofundError> {
        self.set_true_range()?;
        let series = calculate_adx(self.series.bars(), period);
        self.frame.insert_series(&series)
    }

    pub fn set_parabolic_sar(&mut self, params: &SarParams) -> Result<(), RobofundError> {
        let series = calculate_parabolic_sar(self.series.bars(), params);
        self.frame.insert_series(&series)
    }

    pub fn set_linear_regression(&mut self, length: usize) -> Result<(), RobofundError> {
        let series = calculate_linear_regression(self.series.bars(), length);
        self.frame.insert_series(&series)
    }

    pub fn set_keltner_channel(
        &mut self,
        length: usize,
        mult_x100: u32,
    ) -> Result<(), RobofundError> {
        self.set_atr(length)?;
        let series = calculate_keltner(self.series.bars(), length, mult_x100);
        self.frame.insert_series(&series)
    }

    pub fn set_bollinger_bands(
        &mut self,
        length: usize,
        mult_x100: u32,
    ) -> Result<(), RobofundError> {
        let series = calculate_bollinger(self.series.bars(), length, mult_x100);
        self.frame.insert_series(&series)
    }

    pub fn set_squeeze(
        &mut self,
        length_bb: usize,
        mult_bb_x100: u32,
        length_kc: usize,
        mult_kc_x100: u32,
    ) -> Result<(), RobofundError> {
        self.set_bollinger_bands(length_bb, mult_bb_x100)?;
        self.set_keltner_channel(length_kc, mult_kc_x100)?;
        let series = calculate_squeeze(
            self.series.bars(),
            length_bb,
            mult_bb_x100,
            length_kc,
            mult_kc_x100,
        );
        self.frame.insert_series(&series)
    }

    pub fn set_fibonacci(&mut self, params: &FibParams) -> Result<(), RobofundError> {
        let series = calculate_fibonacci(self.series.bars(), params);
        self.frame.insert_series(&series)
    }

    /// Fixed-distance stops: `stop_pips` below (long) / above (short) each
    /// bar's close.
    pub fn set_stops_from_pips(
        &mut self,
        stop_pips_long: f64,
        stop_pips_short: f64,
        one_pip: f64,
    ) {
        for (i, bar) in self.series.bars().iter().enumerate() {
            self.signals.long_stop[i] = Some(bar.close - stop_pips_long * one_pip);
            self.signals.short_stop[i] = Some(bar.close + stop_pips_short * one_pip);
        }
    }

    /// ATR-scaled stops. Computes ATR over `atr_length` first, then offsets
    /// each close by `mult * atr`.
    pub fn set_stops_from_atr(
        &mut self,
        atr_length: usize,
        mult_long: f64,
        mult_short: f64,
    ) -> Result<(), RobofundError> {
        self.set_atr(atr_length)?;
        let atr = self.frame.require_float("atr")?.to_vec();
        for (i, bar) in self.series.bars().iter().enumerate() {
            self.signals.long_stop[i] = atr[i].map(|a| bar.close - a * mult_long);
            self.signals.short_stop[i] = atr[i].map(|a| bar.close + a * mult_short);
        }
        Ok(())
    }

    /// Spike stops: trailing extreme over `look_back_period` bars.
    pub fn set_stops_from_spikes(&mut self, look_back_period: usize) {
        let bars = self.series.bars();
        for i in 0..bars.len() {
            if look_back_period == 0 || i + 1 < look_back_period {
                self.signals.long_stop[i] = None;
                self.signals.short_stop[i] = None;
                continue;
            }
            let window = &bars[i + 1 - look_back_period..=i];
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            self.signals.long_stop[i] = Some(lowest);
            self.signals.short_stop[i] = Some(highest);
        }
    }

    /// Fixed-distance profit-take levels.
    pub fn set_limits_from_pips(
        &mut self,
        limit_pips_long: f64,
        limit_pips_short: f64,
        one_pip: f64,
    ) {
        for (i, bar) in self.series.bars().iter().enumerate() {
            self.signals.long_profit_take[i] = Some(bar.close + limit_pips_long * one_pip);
            self.signals.short_profit_take[i] = Some(bar.close - limit_pips_short * one_pip);
        }
    }

    /// ATR-scaled profit-take levels. Requires a prior ATR computation
    /// (`set_atr` / `set_stops_from_atr`).
    pub fn set_limits_from_atr(
        &mut self,
        mult_long: f64,
        mult_short: f64,
    ) -> Result<(), RobofundError> {
        let atr = self.frame.require_float("atr")?.to_vec();
        for (i, bar) in self.series.bars().iter().enumerate() {
            self.signals.long_profit_take[i] = atr[i].map(|a| bar.close + a * mult_long);
            self.signals.short_profit_take[i] = atr[i].map(|a| bar.close - a * mult_short);
        }
        Ok(())
    }

    /// Install externally derived entry flags for one direction.
    pub fn set_entry_flags(
        &mut self,
        direction: Direction,
        flags: Vec<bool>,
    ) -> Result<(), RobofundError> {
        if flags.len() != self.series.len() {
            return Err(RobofundError::SignalLengthMismatch {
                signals: flags.len(),
                bars: self.series.len(),
            });
        }
        match direction {
            Direction::Long => self.signals.entry_long = flags,
            Direction::Short => self.signals.entry_short = flags,
        }
        Ok(())
    }

    /// Install externally derived exit flags for one direction.
    pub fn set_exit_flags(
        &mut self,
        direction: Direction,
        flags: Vec<bool>,
    ) -> Result<(), RobofundError> {
        if flags.len() != self.series.len() {
            return Err(RobofundError::SignalLengthMismatch {
                signals: flags.len(),
                bars: self.series.len(),
            });
        }
        match direction {
            Direction::Long => self.signals.exit_long = flags,
            Direction::Short => self.signals.exit_short = flags,
        }
        Ok(())
    }

    /// Replace the whole signal annotation at once.
    pub fn set_signals(&mut self, signals: SignalSeries) -> Result<(), RobofundError> {
        signals.validate_len(self.series.len())?;
        self.signals = signals;
        Ok(())
    }

}
