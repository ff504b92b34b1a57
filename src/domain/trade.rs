//! Trade entities materialised by the simulator.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::RobofundError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = RobofundError;

    /// Invalid direction strings are a programming-contract violation and
    /// rejected outright.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(RobofundError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ExitReason {
    Stop,
    Limit,
    Rule,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Stop => write!(f, "STOP"),
            ExitReason::Limit => write!(f, "LIMIT"),
            ExitReason::Rule => write!(f, "RULE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TradeExit {
    pub index: usize,
    pub time: DateTime<Utc>,
    pub price: f64,
    pub reason: ExitReason,
}

/// One trade opened by an entry signal. `exit` stays `None` when no exit
/// condition triggered inside the scan window; that is a boundary condition,
/// not an error.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Trade {
    pub direction: Direction,
    pub entry_index: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit: Option<TradeExit>,
}

impl Trade {
    pub fn is_resolved(&self) -> bool {
        self.exit.is_some()
    }

    /// Notional-scaled signed profit; `None` while unresolved.
    pub fn profit(&self, notional_value: f64) -> Option<f64> {
        let exit = self.exit.as_ref()?;
        let ratio = exit.price / self.entry_price;
        let fraction = match self.direction {
            Direction::Long => ratio - 1.0,
            Direction::Short => 1.0 - ratio,
        };
        Some(fraction * notional_value)
    }

    /// Hold time in hours; `None` while unresolved.
    pub fn hold_hours(&self) -> Option<f64> {
        let exit = self.exit.as_ref()?;
        Some((exit.time - self.entry_time).num_seconds() as f64 / 3600.0)
    }
}
