//! Per-instrument contract details: pip size, notional value, margin rate.

/// Contract sizing for one instrument.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ContractSpec {
    pub instrument: String,
    pub pip_size: f64,
    pub notional_value: f64,
    pub margin_rate: f64,
}

pub const DEFAULT_NOTIONAL_VALUE: f64 = 1_000_000.0;
pub const DEFAULT_MARGIN_RATE: f64 = 0.04;

/// Look up the contract spec for an instrument. Unknown instruments fall back
/// to the default pip size.
pub fn contract_spec(instrument: &str) -> ContractSpec {
    let pip_size = match instrument {
        "AUDUSD" => 0.0001,
        "USDJPY" => 0.01,
        _ => 0.0001,
    };

    ContractSpec {
        instrument: instrument.to_string(),
        pip_size,
        notional_value: DEFAULT_NOTIONAL_VALUE,
        margin_rate: DEFAULT_MARGIN_RATE,
    }
}

impl ContractSpec {
    /// Margin requirement in currency units for one open trade.
    pub fn margin_per_trade(&self) -> f64 {
        self.notional_value * self.margin_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audusd_pip() {
        let spec = contract_spec("AUDUSD");
        assert!((spec.pip_size - 0.0001).abs() < f64::EPSILON);
    }

    #[test]
    fn usdjpy_pip() {
        let spec = contract_spec("USDJPY");
        assert!((spec.pip_size - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_instrument_uses_default_pip() {
        let spec = contract_spec("EURUSD");
        assert!((spec.pip_size - 0.0001).abs() < f64::EPSILON);
        assert!((spec.notional_value - DEFAULT_NOTIONAL_VALUE).abs() < f64::EPSILON);
    }

    #[test]
    fn margin_per_trade() {
        let spec = contract_spec("AUDUSD");
        assert!((spec.margin_per_trade() - 40_000.0).abs() < f64::EPSILON);
    }
}
