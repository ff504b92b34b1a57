//! Market-data access port trait.

use crate::domain::bar::{BarSeries, Resolution};
use crate::domain::error::RobofundError;
use crate::domain::signal::SignalSeries;

/// A bar series plus the optional strategy-layer signal annotation that came
/// with it. How either was materialised (database, broker API, file) is the
/// adapter's concern.
#[derive(Debug)]
pub struct MarketData {
    pub series: BarSeries,
    pub signals: Option<SignalSeries>,
}

pub trait DataPort {
    fn fetch_market_data(
        &self,
        instrument: &str,
        resolution: Resolution,
    ) -> Result<MarketData, RobofundError>;

    fn list_instruments(&self) -> Result<Vec<String>, RobofundError>;
}
