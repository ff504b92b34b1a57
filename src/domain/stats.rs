//! Running per-bar statistics over a completed simulation.
//!
//! One time-ordered pass produces, per bar: realised profit (recorded on the
//! entry bar of each resolved trade), concurrent long/short position
//! counters, the running profit streak and the running drawdown. Update
//! order within a bar matches the trade ledger: profit first, then entries,
//! then exit-signal resets.

use crate::domain::bar::Bar;
use crate::domain::error::RobofundError;
use crate::domain::signal::SignalSeries;
use crate::domain::simulator::SimulationResult;

#[derive(Debug, Clone, PartialEq)]
pub struct RunningStats {
    /// Realised profit per entry bar; `None` where no resolved trade entered.
    pub profit: Vec<Option<f64>>,
    pub long_counter: Vec<u32>,
    pub short_counter: Vec<u32>,
    pub profit_streak: Vec<f64>,
    pub drawdown: Vec<f64>,
    pub max_long_holds: u32,
    pub max_short_holds: u32,
    /// Most negative running drawdown (<= 0).
    pub max_drawdown: f64,
    pub max_profit_streak: f64,
}

pub fn compute_running_stats(
    bars: &[Bar],
    signals: &SignalSeries,
    result: &SimulationResult,
    notional_value: f64,
) -> Result<RunningStats, RobofundError> {
    signals.validate_len(bars.len())?;

    // Realised profit lands on the entry bar; long and short entries on the
    // same bar sum.
    let mut profit: Vec<Option<f64>> = vec![None; bars.len()];
    for trade in &result.trades {
        if let Some(p) = trade.profit(notional_value) {
            let slot = &mut profit[trade.entry_index];
            *slot = Some(slot.unwrap_or(0.0) + p);
        }
    }

    let mut long_counter = vec![0u32; bars.len()];
    let mut short_counter = vec![0u32; bars.len()];
    let mut profit_streak = vec![0.0; bars.len()];
    let mut drawdown = vec![0.0; bars.len()];

    let mut longs = 0u32;
    let mut shorts = 0u32;
    let mut streak = 0.0;
    let mut dd = 0.0;
    let mut max_long_holds = 0u32;
    let mut max_short_holds = 0u32;
    let mut max_drawdown = 0.0_f64;
    let mut max_profit_streak = 0.0_f64;

    for i in 0..bars.len() {
        match profit[i] {
            Some(p) if p > 0.0 => {
                streak += p;
                profit_streak[i] = streak;
                dd = 0.0;
                max_profit_streak = max_profit_streak.max(streak);
            }
            Some(p) if p < 0.0 => {
                dd += p;
                drawdown[i] = dd;
                streak = 0.0;
                max_drawdown = max_drawdown.min(dd);
            }
            _ => {}
        }

        if signals.entry_long[i] {
            longs += 1;
            long_counter[i] = longs;
            max_long_holds = max_long_holds.max(longs);
        }
        if signals.entry_short[i] {
            shorts += 1;
            short_counter[i] = shorts;
            max_short_holds = max_short_holds.max(shorts);
        }
        if result.short_exit_signal[i] {
            shorts = 0;
        }
        if result.long_exit_signal[i] {
            longs = 0;
        }
    }

    Ok(RunningStats {
        profit,
        long_counter,
        short_counter,
        profit_streak,
        drawdown,
        max_long_holds,
        max_short_holds,
        max_drawdown,
        max_profit_streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::bar_at;
    use crate::domain::trade::{Direction, ExitReason, Trade, TradeExit};

    fn bars(n: usize) -> Vec<Bar> {
        (0..n).map(|i| bar_at(i, 100.0, 100.0, 100.0, 100.0)).collect()
    }

    fn trade(entry_index: usize, entry: f64, exit_index: usize, exit: f64) -> Trade {
        let b = bars(exit_index + 1);
        Trade {
            direction: Direction::Long,
            entry_index,
            entry_time: b[entry_index].snapshot_time_utc,
            entry_price: entry,
            exit: Some(TradeExit {
                index: exit_index,
                time: b[exit_index].snapshot_time_utc,
                price: exit,
                reason: ExitReason::Rule,
            }),
        }
    }

    fn result_with(trades: Vec<Trade>, len: usize) -> SimulationResult {
        let mut long_exit_signal = vec![false; len];
        for t in &trades {
            if let Some(exit) = &t.exit {
                long_exit_signal[exit.index] = true;
            }
        }
        SimulationResult {
            trades,
            long_exit_signal,
            short_exit_signal: vec![false; len],
        }
    }

    #[test]
    fn profit_recorded_on_entry_bar() {
        let bars = bars(6);
        let mut signals = SignalSeries::empty(6);
        signals.entry_long[1] = true;
        // +1% on notional 1000 -> +10
        let result = result_with(vec![trade(1, 100.0, 3, 101.0)], 6);

        let stats = compute_running_stats(&bars, &signals, &result, 1000.0).unwrap();
        assert!((stats.profit[1].unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(stats.profit[3], None);
    }

    #[test]
    fn streak_accumulates_and_resets_on_loss() {
        let bars = bars(8);
        let mut signals = SignalSeries::empty(8);
        signals.entry_long[0] = true;
        signals.entry_long[2] = true;
        signals.entry_long[4] = true;
        let result = result_with(
            vec![
                trade(0, 100.0, 1, 101.0),  // +10
                trade(2, 100.0, 3, 102.0),  // +20
                trade(4, 100.0, 5, 99.0),   // -10
            ],
            8,
        );

        let stats = compute_running_stats(&bars, &signals, &result, 1000.0).unwrap();
        assert!((stats.profit_streak[0] - 10.0).abs() < 1e-9);
        assert!((stats.profit_streak[2] - 30.0).abs() < 1e-9);
        assert!((stats.profit_streak[4] - 0.0).abs() < 1e-9);
        assert!((stats.drawdown[4] - (-10.0)).abs() < 1e-9);
        assert!((stats.max_profit_streak - 30.0).abs() < 1e-9);
        assert!((stats.max_drawdown - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn drawdown_accumulates_and_resets_on_win() {
        let bars = bars(8);
        let mut signals = SignalSeries::empty(8);
        signals.entry_long[0] = true;
        signals.entry_long[2] = true;
        signals.entry_long[4] = true;
        let result = result_with(
            vec![
                trade(0, 100.0, 1, 99.0),  // -10
                trade(2, 100.0, 3, 98.0),  // -20
                trade(4, 100.0, 5, 101.0), // +10
            ],
            8,
        );

        let stats = compute_running_stats(&bars, &signals, &result, 1000.0).unwrap();
        assert!((stats.drawdown[0] - (-10.0)).abs() < 1e-9);
        assert!((stats.drawdown[2] - (-30.0)).abs() < 1e-9);
        assert!((stats.drawdown[4] - 0.0).abs() < 1e-9);
        assert!((stats.max_drawdown - (-30.0)).abs() < 1e-9);
    }

    #[test]
    fn counters_track_concurrent_holds() {
        let bars = bars(6);
        let mut signals = SignalSeries::empty(6);
        signals.entry_long[0] = true;
        signals.entry_long[1] = true;
        signals.entry_long[4] = true;

        // both early trades exit on bar 3
        let result = result_with(
            vec![trade(0, 100.0, 3, 101.0), trade(1, 100.0, 3, 101.0)],
            6,
        );

        let stats = compute_running_stats(&bars, &signals, &result, 1000.0).unwrap();
        assert_eq!(stats.long_counter[0], 1);
        assert_eq!(stats.long_counter[1], 2);
        assert_eq!(stats.long_counter[4], 1); // counter reset on bar 3
        assert_eq!(stats.max_long_holds, 2);
    }

    #[test]
    fn entry_and_exit_on_the_same_bar_records_then_resets() {
        let bars = bars(5);
        let mut signals = SignalSeries::empty(5);
        signals.entry_long[0] = true;
        signals.entry_long[2] = true;
        signals.entry_long[3] = true;

        // first trade exits on bar 2, where the second entry also fires
        let result = result_with(
            vec![trade(0, 100.0, 2, 101.0), trade(2, 100.0, 4, 101.0)],
            5,
        );

        let stats = compute_running_stats(&bars, &signals, &result, 1000.0).unwrap();
        // entry recorded before the reset applies
        assert_eq!(stats.long_counter[2], 2);
        // the reset emptied the book, so bar 3's entry counts from one
        assert_eq!(stats.long_counter[3], 1);
    }

    #[test]
    fn unresolved_trades_contribute_no_profit() {
        let bars = bars(4);
        let mut signals = SignalSeries::empty(4);
        signals.entry_long[1] = true;
        let result = SimulationResult {
            trades: vec![Trade {
                direction: Direction::Long,
                entry_index: 1,
                entry_time: bars[1].snapshot_time_utc,
                entry_price: 100.0,
                exit: None,
            }],
            long_exit_signal: vec![false; 4],
            short_exit_signal: vec![false; 4],
        };

        let stats = compute_running_stats(&bars, &signals, &result, 1000.0).unwrap();
        assert!(stats.profit.iter().all(|p| p.is_none()));
        assert_eq!(stats.long_counter[1], 1);
    }
}
