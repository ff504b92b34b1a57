//! Plain-text backtest report adapter.
//!
//! Renders the performance summary in the trade-ledger layout operators are
//! used to: headline figures, yearly/monthly breakdowns, position and risk
//! numbers, then the composite score.

use std::fmt::Write as _;
use std::fs;

use crate::domain::error::RobofundError;
use crate::domain::summary::PerformanceSummary;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

const RULE: &str =
    "----------------------------------------------------------------------";

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn render(summary: &PerformanceSummary, trades: &[Trade]) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Instrument is {}", summary.instrument);
        let _ = writeln!(
            out,
            "Notional value per trade ${:.0}. I.e. without leverage.",
            summary.notional_value
        );
        let _ = writeln!(
            out,
            "At {:.1}% margin, the margin requirement is ${:.0} per trade.",
            summary.margin_rate * 100.0,
            summary.notional_value * summary.margin_rate
        );
        let _ = writeln!(out, "{}", RULE);

        let _ = writeln!(out, "Total profit is ${:.1}", summary.total_profit);
        let _ = writeln!(
            out,
            "Average profit per trade ${:.1}",
            summary.average_profit
        );
        let _ = writeln!(
            out,
            "Total number of trades {} ({} unresolved)",
            summary.trades_resolved, summary.trades_unresolved
        );
        let _ = writeln!(out, "Win rate is {:.1}%", summary.win_rate);
        let _ = writeln!(
            out,
            "Mean hold time is {:.0} hours, max {:.0} hours",
            summary.mean_hold_hours, summary.max_hold_hours
        );
        let _ = writeln!(out, "{}", RULE);

        for (year, profit) in &summary.profit_by_year {
            let _ = writeln!(out, "{}    ${:.1}", year, profit);
        }
        let _ = writeln!(out, "{}", RULE);

        let _ = writeln!(
            out,
            "Max number of long positions {}",
            summary.max_long_positions
        );
        let _ = writeln!(
            out,
            "Max number of short positions {}",
            summary.max_short_positions
        );
        let _ = writeln!(
            out,
            "Biggest single loss ${:.0}",
            summary.biggest_loss
        );
        let _ = writeln!(
            out,
            "Biggest single profit ${:.0}",
            summary.biggest_profit
        );
        let _ = writeln!(out, "Max drawdown ${:.0}", summary.max_drawdown);
        let _ = writeln!(
            out,
            "Largest profit streak ${:.0}",
            summary.max_profit_streak
        );
        let _ = writeln!(out, "Long profit ${:.1}", summary.long_profit);
        let _ = writeln!(out, "Short profit ${:.1}", summary.short_profit);
        let _ = writeln!(
            out,
            "Minimum account balance required ${:.0}",
            summary.required_balance
        );
        let _ = writeln!(out, "{}", RULE);

        let _ = writeln!(
            out,
            "Annualized return {:.2}%, Sharpe ratio {:.2}",
            summary.annualized_return * 100.0,
            summary.sharpe_ratio
        );
        let _ = writeln!(
            out,
            "Score {:.1} (win rate {:.1}, profit/drawdown {:.1}, avg gain {:.1}, monthly {:.1})",
            summary.score.total,
            summary.score.win_rate_score,
            summary.score.profit_drawdown_score,
            summary.score.average_gain_score,
            summary.score.monthly_win_rate_score
        );
        let _ = writeln!(out, "Trades: {}", trades.len());

        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        summary: &PerformanceSummary,
        trades: &[Trade],
        output_path: &str,
    ) -> Result<(), RobofundError> {
        let rendered = Self::render(summary, trades);
        if output_path == "-" {
            print!("{}", rendered);
        } else {
            fs::write(output_path, rendered)?;
        }
        Ok(())
    }
}

/// JSON report adapter: the machine-consumable face of the same summary.
pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        summary: &PerformanceSummary,
        trades: &[Trade],
        output_path: &str,
    ) -> Result<(), RobofundError> {
        let payload = serde_json::json!({
            "summary": summary,
            "trades": trades,
        });
        let rendered =
            serde_json::to_string_pretty(&payload).map_err(|e| RobofundError::Data {
                reason: format!("JSON serialisation failed: {}", e),
            })?;

        if output_path == "-" {
            println!("{}", rendered);
        } else {
            fs::write(output_path, rendered)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::ScoreCard;
    use std::collections::BTreeMap;

    fn sample_summary() -> PerformanceSummary {
        PerformanceSummary {
            instrument: "AUDUSD".into(),
            notional_value: 1_000_000.0,
            margin_rate: 0.04,
            risk_free_rate: 0.04,
            total_profit: 12_345.6,
            average_profit: 1234.56,
            long_profit: 10_000.0,
            short_profit: 2345.6,
            trades_resolved: 10,
            trades_unresolved: 2,
            trades_won: 6,
            trades_lost: 4,
            win_rate: 60.0,
            profit_by_year: BTreeMap::from([(2024, 12_345.6)]),
            profit_by_month: BTreeMap::from([("2024-01".to_string(), 12_345.6)]),
            max_long_positions: 3,
            max_short_positions: 1,
            biggest_profit: 5000.0,
            biggest_loss: -2000.0,
            max_drawdown: -3000.0,
            max_profit_streak: 8000.0,
            mean_hold_hours: 12.0,
            max_hold_hours: 48.0,
            required_balance: 163_000.0,
            yearly_returns: BTreeMap::from([(2024, 0.0757)]),
            annualized_return: 0.0757,
            sharpe_ratio: 0.0,
            score: ScoreCard {
                win_rate_score: 2.5,
                profit_drawdown_score: 3.0,
                average_gain_score: 1.5,
                monthly_win_rate_score: 2.0,
                total: 9.0,
            },
        }
    }

    #[test]
    fn render_contains_headline_figures() {
        let rendered = TextReportAdapter::render(&sample_summary(), &[]);
        assert!(rendered.contains("Instrument is AUDUSD"));
        assert!(rendered.contains("Total profit is $12345.6"));
        assert!(rendered.contains("Win rate is 60.0%"));
        assert!(rendered.contains("Minimum account balance required $163000"));
        assert!(rendered.contains("Score 9.0"));
    }

    #[test]
    fn render_lists_yearly_breakdown() {
        let rendered = TextReportAdapter::render(&sample_summary(), &[]);
        assert!(rendered.contains("2024    $12345.6"));
    }

    #[test]
    fn text_report_writes_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        TextReportAdapter
            .write(&sample_summary(), &[], path.to_str().unwrap())
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Instrument is AUDUSD"));
    }

    #[test]
    fn json_report_is_machine_consumable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        JsonReportAdapter
            .write(&sample_summary(), &[], path.to_str().unwrap())
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["summary"]["instrument"], "AUDUSD");
        assert_eq!(parsed["summary"]["trades_resolved"], 10);
    }
}
