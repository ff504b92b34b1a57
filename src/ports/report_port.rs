//! Report generation port trait.

use crate::domain::error::RobofundError;
use crate::domain::summary::PerformanceSummary;
use crate::domain::trade::Trade;

/// Port for writing backtest reports. `output_path` of "-" means stdout.
pub trait ReportPort {
    fn write(
        &self,
        summary: &PerformanceSummary,
        trades: &[Trade],
        output_path: &str,
    ) -> Result<(), RobofundError>;
}
