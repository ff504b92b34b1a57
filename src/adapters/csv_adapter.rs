//! CSV file data adapter.
//!
//! Reads `{instrument}_{resolution}.csv` from a base directory. Required
//! headers: snapshotTimeUTC, openPrice, highPrice, lowPrice, closePrice,
//! volume. When the signal headers (entry_long, entry_short, exit_long,
//! exit_short, long_stop, short_stop, long_profit_take, short_profit_take)
//! are present the strategy-layer annotation is loaded alongside the bars;
//! empty numeric cells become "no value".

use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::bar::{Bar, BarSeries, Resolution};
use crate::domain::error::RobofundError;
use crate::domain::signal::SignalSeries;
use crate::ports::data_port::{DataPort, MarketData};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str, resolution: Resolution) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", instrument, resolution))
    }

    fn parse_time(value: &str) -> Result<DateTime<Utc>, RobofundError> {
        let formats = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
        for format in formats {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(naive.and_utc());
            }
        }
        Err(RobofundError::Data {
            reason: format!("invalid snapshotTimeUTC value: {}", value),
        })
    }

    fn parse_price(value: &str, field: &str) -> Result<f64, RobofundError> {
        value.trim().parse().map_err(|e| RobofundError::Data {
            reason: format!("invalid {} value '{}': {}", field, value, e),
        })
    }

    fn parse_flag(value: &str) -> bool {
        matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
    }

    fn parse_level(value: &str, field: &str) -> Result<Option<f64>, RobofundError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Self::parse_price(trimmed, field).map(Some)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_market_data(
        &self,
        instrument: &str,
        resolution: Resolution,
    ) -> Result<MarketData, RobofundError> {
        let path = self.csv_path(instrument, resolution);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| RobofundError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let headers = rdr.headers().map_err(|e| RobofundError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let index_of = |name: &str| headers.iter().position(|h| h == name);

        let required = [
            "snapshotTimeUTC",
            "openPrice",
            "highPrice",
            "lowPrice",
            "closePrice",
        ];
        let mut columns = std::collections::HashMap::new();
        for name in required {
            let idx = index_of(name).ok_or_else(|| RobofundError::Data {
                reason: format!("missing required column {}", name),
            })?;
            columns.insert(name, idx);
        }
        let volume_idx = index_of("volume");

        let signal_headers = [
            "entry_long",
            "entry_short",
            "exit_long",
            "exit_short",
            "long_stop",
            "short_stop",
            "long_profit_take",
            "short_profit_take",
        ];
        let signal_indices: Option<Vec<usize>> = signal_headers
            .iter()
            .map(|&name| index_of(name))
            .collect();

        let mut bars = Vec::new();
        let mut signals = SignalSeries::empty(0);

        for result in rdr.records() {
            let record = result.map_err(|e| RobofundError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let snapshot_time_utc = Self::parse_time(field(columns["snapshotTimeUTC"]))?;
            let open = Self::parse_price(field(columns["openPrice"]), "openPrice")?;
            let high = Self::parse_price(field(columns["highPrice"]), "highPrice")?;
            let low = Self::parse_price(field(columns["lowPrice"]), "lowPrice")?;
            let close = Self::parse_price(field(columns["closePrice"]), "closePrice")?;
            let volume = match volume_idx {
                Some(idx) => field(idx).trim().parse().unwrap_or(0),
                None => 0,
            };

            bars.push(Bar {
                snapshot_time_utc,
                instrument: instrument.to_string(),
                resolution,
                open,
                high,
                low,
                close,
                volume,
            });

            if let Some(indices) = &signal_indices {
                signals.entry_long.push(Self::parse_flag(field(indices[0])));
                signals.entry_short.push(Self::parse_flag(field(indices[1])));
                signals.exit_long.push(Self::parse_flag(field(indices[2])));
                signals.exit_short.push(Self::parse_flag(field(indices[3])));
                signals
                    .long_stop
                    .push(Self::parse_level(field(indices[4]), "long_stop")?);
                signals
                    .short_stop
                    .push(Self::parse_level(field(indices[5]), "short_stop")?);
                signals
                    .long_profit_take
                    .push(Self::parse_level(field(indices[6]), "long_profit_take")?);
                signals
                    .short_profit_take
                    .push(Self::parse_level(field(indices[7]), "short_profit_take")?);
            }
        }

        let series = BarSeries::new(bars)?;
        let signals = if signal_indices.is_some() {
            signals.validate_len(series.len())?;
            Some(signals)
        } else {
            None
        };

        Ok(MarketData { series, signals })
    }

    fn list_instruments(&self) -> Result<Vec<String>, RobofundError> {
        let entries = std::fs::read_dir(&self.base_path).map_err(|e| RobofundError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut instruments: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let stem = name.strip_suffix(".csv")?;
                let (instrument, resolution) = stem.split_once('_')?;
                Resolution::from_str(resolution).ok()?;
                Some(instrument.to_string())
            })
            .collect();
        instruments.sort();
        instruments.dedup();
        Ok(instruments)
    }
}
