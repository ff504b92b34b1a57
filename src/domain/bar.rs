//! OHLCV bar representation and the validated bar series.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::RobofundError;

/// Bar size of one market-data snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Resolution {
    Minute10,
    Minute15,
    Hour,
    Day,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Minute10 => "MINUTE_10",
            Resolution::Minute15 => "MINUTE_15",
            Resolution::Hour => "HOUR",
            Resolution::Day => "DAY",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Resolution {
    type Err = RobofundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MINUTE_10" | "10MIN" => Ok(Resolution::Minute10),
            "MINUTE_15" | "15MIN" => Ok(Resolution::Minute15),
            "HOUR" | "1H" => Ok(Resolution::Hour),
            "DAY" | "1D" | "DAILY" => Ok(Resolution::Day),
            _ => Err(RobofundError::InvalidResolution {
                value: s.to_string(),
            }),
        }
    }
}

/// One OHLCV price snapshot.
///
/// The ordering invariant `low <= {open, close} <= high` is an input-quality
/// assumption and is not enforced here.
#[derive(Debug, Clone)]
pub struct Bar {
    pub snapshot_time_utc: DateTime<Utc>,
    pub instrument: String,
    pub resolution: Resolution,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// (high + low) / 2
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// A time-ordered bar sequence for one instrument/resolution.
///
/// Construction is the ingestion boundary: non-monotonic or duplicate
/// timestamps and non-finite prices are rejected outright, so everything
/// downstream can assume a well-formed series.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, RobofundError> {
        if bars.is_empty() {
            return Err(RobofundError::EmptySeries);
        }

        for (i, bar) in bars.iter().enumerate() {
            for (field, value) in [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
            ] {
                if !value.is_finite() {
                    return Err(RobofundError::InvalidPrice { index: i, field });
                }
            }

            if i > 0 && bar.snapshot_time_utc <= bars[i - 1].snapshot_time_utc {
                return Err(RobofundError::NonMonotonic { index: i });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn instrument(&self) -> &str {
        &self.bars[0].instrument
    }

    pub fn resolution(&self) -> Resolution {
        self.bars[0].resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_bar(minute: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            snapshot_time_utc: Utc.with_ymd_and_hms(2024, 1, 15, 9, minute, 0).unwrap(),
            instrument: "AUDUSD".into(),
            resolution: Resolution::Minute10,
            open,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn midpoint() {
        let bar = make_bar(0, 100.0, 110.0, 90.0, 105.0);
        assert!((bar.midpoint() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = make_bar(0, 100.0, 110.0, 90.0, 105.0);
        // high-low=20, |high-100|=10, |low-100|=10 -> 20
        assert!((bar.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bar = make_bar(0, 100.0, 110.0, 90.0, 105.0);
        // high-low=20, |110-70|=40, |90-70|=20 -> 40
        assert!((bar.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_accepts_ordered_bars() {
        let bars = vec![
            make_bar(0, 1.0, 2.0, 0.5, 1.5),
            make_bar(10, 1.5, 2.5, 1.0, 2.0),
        ];
        let series = BarSeries::new(bars).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.instrument(), "AUDUSD");
        assert_eq!(series.resolution(), Resolution::Minute10);
    }

    #[test]
    fn series_rejects_empty() {
        let err = BarSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, RobofundError::EmptySeries));
    }

    #[test]
    fn series_rejects_duplicate_timestamps() {
        let bars = vec![
            make_bar(0, 1.0, 2.0, 0.5, 1.5),
            make_bar(0, 1.5, 2.5, 1.0, 2.0),
        ];
        let err = BarSeries::new(bars).unwrap_err();
        assert!(matches!(err, RobofundError::NonMonotonic { index: 1 }));
    }

    #[test]
    fn series_rejects_out_of_order_timestamps() {
        let bars = vec![
            make_bar(20, 1.0, 2.0, 0.5, 1.5),
            make_bar(10, 1.5, 2.5, 1.0, 2.0),
        ];
        let err = BarSeries::new(bars).unwrap_err();
        assert!(matches!(err, RobofundError::NonMonotonic { index: 1 }));
    }

    #[test]
    fn series_rejects_non_finite_price() {
        let bars = vec![make_bar(0, 1.0, f64::NAN, 0.5, 1.5)];
        let err = BarSeries::new(bars).unwrap_err();
        assert!(matches!(
            err,
            RobofundError::InvalidPrice {
                index: 0,
                field: "high"
            }
        ));
    }

    #[test]
    fn resolution_round_trip() {
        assert_eq!(
            "MINUTE_10".parse::<Resolution>().unwrap(),
            Resolution::Minute10
        );
        assert_eq!("daily".parse::<Resolution>().unwrap(), Resolution::Day);
        assert!("weekly".parse::<Resolution>().is_err());
        assert_eq!(Resolution::Minute15.to_string(), "MINUTE_15");
    }
}
