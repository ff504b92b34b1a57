//! Domain error types.

/// Top-level error type for robofund.
#[derive(Debug, thiserror::Error)]
pub enum RobofundError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("bar timestamps not strictly increasing at index {index}")]
    NonMonotonic { index: usize },

    #[error("non-finite {field} price at index {index}")]
    InvalidPrice { index: usize, field: &'static str },

    #[error("invalid trade direction: {value}")]
    InvalidDirection { value: String },

    #[error("signal series length {signals} does not match bar series length {bars}")]
    SignalLengthMismatch { signals: usize, bars: usize },

    #[error("column length {column} does not match series length {bars}")]
    ColumnLengthMismatch { column: usize, bars: usize },

    #[error("required column {name} has not been computed")]
    MissingColumn { name: String },

    #[error("invalid resolution: {value}")]
    InvalidResolution { value: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data for {instrument}: have {bars} bars, need {minimum}")]
    InsufficientData {
        instrument: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RobofundError> for std::process::ExitCode {
    fn from(err: &RobofundError) -> Self {
        let code: u8 = match err {
            RobofundError::Io(_) => 1,
            RobofundError::ConfigParse { .. }
            | RobofundError::ConfigMissing { .. }
            | RobofundError::ConfigInvalid { .. } => 2,
            RobofundError::Data { .. } | RobofundError::InsufficientData { .. } => 3,
            RobofundError::EmptySeries
            | RobofundError::NonMonotonic { .. }
            | RobofundError::InvalidPrice { .. }
            | RobofundError::InvalidResolution { .. } => 4,
            RobofundError::InvalidDirection { .. }
            | RobofundError::SignalLengthMismatch { .. }
            | RobofundError::ColumnLengthMismatch { .. }
            | RobofundError::MissingColumn { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
