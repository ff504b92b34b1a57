#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

pub use robofund::domain::bar::{Bar, BarSeries, Resolution};
use robofund::domain::error::RobofundError;
pub use robofund::domain::signal::SignalSeries;
use robofund::ports::data_port::{DataPort, MarketData};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
}

/// Bar `i` in a 10-minute grid.
pub fn bar_at(i: usize, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        snapshot_time_utc: base_time() + Duration::minutes(10 * i as i64),
        instrument: "AUDUSD".into(),
        resolution: Resolution::Minute10,
        open,
        high,
        low,
        close,
        volume: 1000,
    }
}

/// Flat bars where open = high = low = close.
pub fn flat_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| bar_at(i, c, c, c, c))
        .collect()
}

/// Bars from (high, low, close) triples, open = close.
pub fn ohlc_bars(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
    rows.iter()
        .enumerate()
        .map(|(i, &(high, low, close))| bar_at(i, close, high, low, close))
        .collect()
}

pub struct MockDataPort {
    pub data: HashMap<String, MarketData>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_market_data(mut self, instrument: &str, data: MarketData) -> Self {
        self.data.insert(instrument.to_string(), data);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_market_data(
        &self,
        instrument: &str,
        _resolution: Resolution,
    ) -> Result<MarketData, RobofundError> {
        let found = self
            .data
            .get(instrument)
            .ok_or_else(|| RobofundError::Data {
                reason: format!("no data for {}", instrument),
            })?;
        Ok(MarketData {
            series: found.series.clone(),
            signals: found.signals.clone(),
        })
    }

    fn list_instruments(&self) -> Result<Vec<String>, RobofundError> {
        let mut instruments: Vec<String> = self.data.keys().cloned().collect();
        instruments.sort();
        Ok(instruments)
    }
}
