//! Backtest performance summary, composite scoring and Sharpe ratio.
//!
//! `PerformanceSummary` is a single value type with named fields, built once
//! at the end of aggregation and serialisable for machine consumers.
//!
//! Documented conventions:
//! - win rate is a percentage of resolved trades; unresolved trades are
//!   counted separately and excluded from every profit figure;
//! - required balance = margin_per_trade * (max_holds + 1) + |max drawdown|;
//! - yearly return = year profit / required balance; the annualized return
//!   compounds yearly returns geometrically;
//! - Sharpe = (annualized - risk-free) / stdev(yearly returns), with a zero
//!   standard deviation mapping to 0.0 rather than dividing by zero.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::instrument::ContractSpec;
use crate::domain::stats::RunningStats;
use crate::domain::trade::{Direction, Trade};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.04;

/// Score bucket thresholds. Policy constants, not tunable inputs.
const WIN_RATE_TIERS: [(f64, f64); 4] = [(70.0, 3.0), (60.0, 2.5), (50.0, 2.0), (40.0, 1.0)];
const PROFIT_DRAWDOWN_TIERS: [(f64, f64); 4] = [(4.0, 3.0), (3.0, 2.5), (2.0, 2.0), (1.0, 1.0)];
const AVERAGE_GAIN_TIERS: [(f64, f64); 4] =
    [(2000.0, 2.0), (1000.0, 1.5), (500.0, 1.0), (100.0, 0.5)];
const MONTHLY_WIN_RATE_TIERS: [(f64, f64); 3] = [(80.0, 2.0), (65.0, 1.5), (50.0, 1.0)];

/// Four independently bucketed sub-scores and their sum.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScoreCard {
    pub win_rate_score: f64,
    pub profit_drawdown_score: f64,
    pub average_gain_score: f64,
    pub monthly_win_rate_score: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PerformanceSummary {
    pub instrument: String,
    pub notional_value: f64,
    pub margin_rate: f64,
    pub risk_free_rate: f64,

    pub total_profit: f64,
    pub average_profit: f64,
    pub long_profit: f64,
    pub short_profit: f64,

    pub trades_resolved: usize,
    pub trades_unresolved: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    /// Percentage of resolved trades, 0-100.
    pub win_rate: f64,

    pub profit_by_year: BTreeMap<i32, f64>,
    /// Keyed "YYYY-MM".
    pub profit_by_month: BTreeMap<String, f64>,

    pub max_long_positions: u32,
    pub max_short_positions: u32,
    pub biggest_profit: f64,
    pub biggest_loss: f64,
    /// Most negative running drawdown (<= 0).
    pub max_drawdown: f64,
    pub max_profit_streak: f64,

    pub mean_hold_hours: f64,
    pub max_hold_hours: f64,

    pub required_balance: f64,
    pub yearly_returns: BTreeMap<i32, f64>,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,

    pub score: ScoreCard,
}

impl PerformanceSummary {
    pub fn compute(
        trades: &[Trade],
        stats: &RunningStats,
        spec: &ContractSpec,
        risk_free_rate: f64,
    ) -> Self {
        let notional = spec.notional_value;

        let mut total_profit = 0.0;
        let mut long_profit = 0.0;
        let mut short_profit = 0.0;
        let mut trades_resolved = 0usize;
        let mut trades_unresolved = 0usize;
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut biggest_profit = 0.0_f64;
        let mut biggest_loss = 0.0_f64;
        let mut profit_by_year: BTreeMap<i32, f64> = BTreeMap::new();
        let mut profit_by_month: BTreeMap<String, f64> = BTreeMap::new();
        let mut hold_hours: Vec<f64> = Vec::new();

        for trade in trades {
            let Some(profit) = trade.profit(notional) else {
                trades_unresolved += 1;
                continue;
            };

            trades_resolved += 1;
            total_profit += profit;
            match trade.direction {
                Direction::Long => long_profit += profit,
                Direction::Short => short_profit += profit,
            }

            if profit > 0.0 {
                trades_won += 1;
            } else if profit < 0.0 {
                trades_lost += 1;
            }
            biggest_profit = biggest_profit.max(profit);
            biggest_loss = biggest_loss.min(profit);

            let entry = trade.entry_time;
            *profit_by_year.entry(entry.year()).or_insert(0.0) += profit;
            *profit_by_month
                .entry(format!("{}-{:02}", entry.year(), entry.month()))
                .or_insert(0.0) += profit;

            if let Some(hours) = trade.hold_hours() {
                hold_hours.push(hours);
            }
        }

        let average_profit = if trades_resolved > 0 {
            total_profit / trades_resolved as f64
        } else {
            0.0
        };

        let win_rate = if trades_resolved > 0 {
            trades_won as f64 / trades_resolved as f64 * 100.0
        } else {
            0.0
        };

        let mean_hold_hours = if hold_hours.is_empty() {
            0.0
        } else {
            hold_hours.iter().sum::<f64>() / hold_hours.len() as f64
        };
        let max_hold_hours = hold_hours.iter().fold(0.0_f64, |a, &b| a.max(b));

        let max_holds = stats.max_long_holds.max(stats.max_short_holds);
        let required_balance =
            spec.margin_per_trade() * (max_holds as f64 + 1.0) + stats.max_drawdown.abs();

        let yearly_returns: BTreeMap<i32, f64> = if required_balance > 0.0 {
            profit_by_year
                .iter()
                .map(|(&year, &profit)| (year, profit / required_balance))
                .collect()
        } else {
            BTreeMap::new()
        };

        let annualized_return = annualize(&yearly_returns);
        let sharpe_ratio = sharpe(&yearly_returns, annualized_return, risk_free_rate);

        let score = score_card(
            win_rate,
            total_profit,
            stats.max_drawdown,
            average_profit,
            &profit_by_month,
        );

        PerformanceSummary {
            instrument: spec.instrument.clone(),
            notional_value: notional,
            margin_rate: spec.margin_rate,
            risk_free_rate,
            total_profit,
            average_profit,
            long_profit,
            short_profit,
            trades_resolved,
            trades_unresolved,
            trades_won,
            trades_lost,
            win_rate,
            profit_by_year,
            profit_by_month,
            max_long_positions: stats.max_long_holds,
            max_short_positions: stats.max_short_holds,
            biggest_profit,
            biggest_loss,
            max_drawdown: stats.max_drawdown,
            max_profit_streak: stats.max_profit_streak,
            mean_hold_hours,
            max_hold_hours,
            required_balance,
            yearly_returns,
            annualized_return,
            sharpe_ratio,
            score,
        }
    }

}

/// Geometric compounding of yearly returns: (prod(1+r))^(1/years) - 1.
fn annualize(yearly_returns: &BTreeMap<i32, f64>) -> f64 {
    if yearly_returns.is_empty() {
        return 0.0;
    }

    let compound: f64 = yearly_returns.values().map(|r| 1.0 + r).product();
    if compound <= 0.0 {
        // a catastrophic year wipes the base; report a full loss
        return -1.0;
    }
    compound.powf(1.0 / yearly_returns.len() as f64) - 1.0
}

/// Excess annualized return over the stdev of yearly returns. A zero
/// standard deviation (fewer than two years, or identical years) maps to 0.0.
fn sharpe(yearly_returns: &BTreeMap<i32, f64>, annualized: f64, risk_free_rate: f64) -> f64 {
    if yearly_returns.len() < 2 {
        return 0.0;
    }

    let n = yearly_returns.len() as f64;
    let mean = yearly_returns.values().sum::<f64>() / n;
    let variance = yearly_returns
        .values()
        .map(|r| (r - mean) * (r - mean))
        .sum::<f64>()
        / n;
    let stdev = variance.sqrt();

    if stdev == 0.0 {
        0.0
    } else {
        (annualized - risk_free_rate) / stdev
    }
}

fn tier_score(value: f64, tiers: &[(f64, f64)]) -> f64 {
    for &(threshold, score) in tiers {
        if value >= threshold {
            return score;
        }
    }
    0.0
}

fn score_card(
    win_rate: f64,
    total_profit: f64,
    max_drawdown: f64,
    average_profit: f64,
    profit_by_month: &BTreeMap<String, f64>,
) -> ScoreCard {
    let win_rate_score = tier_score(win_rate, &WIN_RATE_TIERS);

    let profit_drawdown_score = if max_drawdown.abs() > 0.0 {
        tier_score(total_profit / max_drawdown.abs(), &PROFIT_DRAWDOWN_TIERS)
    } else if total_profit > 0.0 {
        // no drawdown at all: best tier
        PROFIT_DRAWDOWN_TIERS[0].1
    } else {
        0.0
    };

    let average_gain_score = tier_score(average_profit, &AVERAGE_GAIN_TIERS);

    let monthly_win_rate_score = if profit_by_month.is_empty() {
        0.0
    } else {
        let winning = profit_by_month.values().filter(|&&p| p > 0.0).count();
        let rate = winning as f64 / profit_by_month.len() as f64 * 100.0;
        tier_score(rate, &MONTHLY_WIN_RATE_TIERS)
    };

    let total =
        win_rate_score + profit_drawdown_score + average_gain_score + monthly_win_rate_score;

    ScoreCard {
        win_rate_score,
        profit_drawdown_score,
        average_gain_score,
        monthly_win_rate_score,
        total,
    }
}
