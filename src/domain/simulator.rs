//! Trade-exit resolution by forward scan.
//!
//! For every bar carrying an entry flag a trade opens at that bar's close.
//! The scan walks subsequent bars (never the entry bar itself) and resolves
//! the trade at the first bar where a condition holds, checked per bar in
//! priority order STOP > LIMIT > RULE:
//!
//! - STOP:  low < long_stop (LONG) / high > short_stop (SHORT), exit at the
//!   stop level
//! - LIMIT: high > long_profit_take (LONG) / low < short_profit_take
//!   (SHORT), exit at the limit level
//! - RULE:  the external exit flag, exit at that bar's close
//!
//! Long and short entries on the same bar are resolved independently.
//! A trade whose window ends without a trigger stays unresolved; no
//! synthetic exit is invented.

use crate::domain::bar::Bar;
use crate::domain::error::RobofundError;
use crate::domain::signal::SignalSeries;
use crate::domain::trade::{Direction, ExitReason, Trade, TradeExit};

/// How far the forward scan may look.
///
/// `Bars(k)` exists purely as a bounded-work mode: whenever the true exit
/// falls within k bars it must produce results identical to `ToEnd`;
/// otherwise the trade surfaces as unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanWindow {
    ToEnd,
    Bars(usize),
}

/// Stop handling during the scan.
///
/// `Trailing` keeps the original entry-to-stop distance and ratchets the
/// working stop in the trade's favour whenever the close has moved more than
/// `step` beyond the level that distance implies. The ratchet takes effect
/// from the next scanned bar and never loosens the stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopMode {
    Static,
    Trailing { step: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub scan: ScanWindow,
    pub stop_mode: StopMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            scan: ScanWindow::ToEnd,
            stop_mode: StopMode::Static,
        }
    }
}

/// Resolved trades plus per-bar exit-signal flags marking each exit bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub trades: Vec<Trade>,
    pub long_exit_signal: Vec<bool>,
    pub short_exit_signal: Vec<bool>,
}

impl SimulationResult {
    pub fn unresolved_count(&self) -> usize {
        self.trades.iter().filter(|t| !t.is_resolved()).count()
    }
}

pub fn simulate_trades(
    bars: &[Bar],
    signals: &SignalSeries,
    config: &SimulationConfig,
) -> Result<SimulationResult, RobofundError> {
    signals.validate_len(bars.len())?;

    let mut trades = Vec::new();
    let mut long_exit_signal = vec![false; bars.len()];
    let mut short_exit_signal = vec![false; bars.len()];

    for i in 0..bars.len() {
        if signals.entry_long[i] {
            let exit = resolve_exit(bars, signals, i, Direction::Long, config);
            if let Some(exit) = &exit {
                long_exit_signal[exit.index] = true;
            }
            trades.push(Trade {
                direction: Direction::Long,
                entry_index: i,
                entry_time: bars[i].snapshot_time_utc,
                entry_price: bars[i].close,
                exit,
            });
        }

        if signals.entry_short[i] {
            let exit = resolve_exit(bars, signals, i, Direction::Short, config);
            if let Some(exit) = &exit {
                short_exit_signal[exit.index] = true;
            }
            trades.push(Trade {
                direction: Direction::Short,
                entry_index: i,
                entry_time: bars[i].snapshot_time_utc,
                entry_price: bars[i].close,
                exit,
            });
        }
    }

    Ok(SimulationResult {
        trades,
        long_exit_signal,
        short_exit_signal,
    })
}

fn resolve_exit(
    bars: &[Bar],
    signals: &SignalSeries,
    entry: usize,
    direction: Direction,
    config: &SimulationConfig,
) -> Option<TradeExit> {
    let entry_price = bars[entry].close;
    let (stop_level, limit_level, exit_flags) = match direction {
        Direction::Long => (
            signals.long_stop[entry],
            signals.long_profit_take[entry],
            &signals.exit_long,
        ),
        Direction::Short => (
            signals.short_stop[entry],
            signals.short_profit_take[entry],
            &signals.exit_short,
        ),
    };

    let end = match config.scan {
        ScanWindow::ToEnd => bars.len(),
        ScanWindow::Bars(k) => bars.len().min(entry + 1 + k),
    };

    let mut working_stop = stop_level;
    let distance = stop_level.map(|s| (entry_price - s).abs());

    for j in (entry + 1)..end {
        let bar = &bars[j];

        if let Some(stop) = working_stop {
            let breached = match direction {
                Direction::Long => bar.low < stop,
                Direction::Short => bar.high > stop,
            };
            if breached {
                return Some(TradeExit {
                    index: j,
                    time: bar.snapshot_time_utc,
                    price: stop,
                    reason: ExitReason::Stop,
                });
            }
        }

        if let Some(limit) = limit_level {
            let reached = match direction {
                Direction::Long => bar.high > limit,
                Direction::Short => bar.low < limit,
            };
            if reached {
                return Some(TradeExit {
                    index: j,
                    time: bar.snapshot_time_utc,
                    price: limit,
                    reason: ExitReason::Limit,
                });
            }
        }

        if exit_flags[j] {
            return Some(TradeExit {
                index: j,
                time: bar.snapshot_time_utc,
                price: bar.close,
                reason: ExitReason::Rule,
            });
        }

        if let (StopMode::Trailing { step }, Some(stop), Some(dist)) =
            (config.stop_mode, working_stop, distance)
        {
            let candidate = match direction {
                Direction::Long => bar.close - dist,
                Direction::Short => bar.close + dist,
            };
            let improved = match direction {
                Direction::Long => candidate > stop + step,
                Direction::Short => candidate < stop - step,
            };
            if improved {
                working_stop = Some(candidate);
            }
        }
    }

    None
}
