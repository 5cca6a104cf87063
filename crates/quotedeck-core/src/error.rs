use thiserror::Error;

/// Validation and contract errors exposed by `quotedeck-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid period '{value}', expected one of 1D, 1W, 1M, 3M, 6M, 1Y")]
    InvalidPeriod { value: String },
    #[error("invalid time range '{value}', expected one of 1W, 1M, 3M, 6M, 1Y")]
    InvalidTimeRange { value: String },

    #[error("unrecognized timestamp '{value}'")]
    UnparseableTimestamp { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("company name cannot be empty")]
    EmptyCompanyName,
}

/// Failure taxonomy for backend fetches.
///
/// `Network` and `Status` cover unreachable services and non-2xx replies,
/// `Parse` covers malformed JSON or unexpected shapes, and `Validation`
/// covers bodies that decode but violate the contract. Record-level
/// validation inside a series is recovered locally by the normalizer and
/// never surfaces here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("network failure: {message}")]
    Network { message: String },

    #[error("backend returned status {status}")]
    Status { status: u16 },

    #[error("parse failure: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub const fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Stable machine-readable code used by CLI envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "fetch.network",
            Self::Status { .. } => "fetch.status",
            Self::Parse { .. } => "fetch.parse",
            Self::Validation(_) => "fetch.validation",
        }
    }

    /// Whether a user-triggered retry is worth offering.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}
