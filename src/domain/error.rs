//! Domain error types.

/// Top-level error type for stocksim.
#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("insufficient data for {symbol}: have {points} points, need {minimum}")]
    InsufficientData {
        symbol: String,
        points: usize,
        minimum: usize,
    },

    #[error("unknown distribution: {name} (expected normal, lognormal or uniform)")]
    UnknownDistribution { name: String },

    #[error("no historical data for {symbol}")]
    NoHistoricalData { symbol: String },

    #[error("failed to fetch {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("invalid distribution parameters: {reason}")]
    InvalidParameters { reason: String },

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

    #[error("chart render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocksimError> for std::process::ExitCode {
    fn from(err: &StocksimError) -> Self {
        let code: u8 = match err {
            StocksimError::Io(_) | StocksimError::Render { .. } => 1,
            StocksimError::ConfigParse { .. }
            | StocksimError::ConfigMissing { .. }
            | StocksimError::ConfigInvalid { .. } => 2,
            StocksimError::Fetch { .. } => 3,
            StocksimError::UnknownDistribution { .. }
            | StocksimError::InvalidParameters { .. } => 4,
            StocksimError::UnknownSymbol { .. }
            | StocksimError::NoHistoricalData { .. }
            | StocksimError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = StocksimError::InsufficientData {
            symbol: "AAPL".into(),
            points: 1,
            minimum: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for AAPL: have 1 points, need 2"
        );
    }

    #[test]
    fn unknown_distribution_names_the_input() {
        let err = StocksimError::UnknownDistribution {
            name: "poisson".into(),
        };
        assert!(err.to_string().contains("poisson"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StocksimError = io.into();
        assert!(matches!(err, StocksimError::Io(_)));
    }
}
