use thiserror::Error;

/// Validation and contract errors exposed by `valuator-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("exchange rate must be strictly positive: {value}")]
    NonPositiveRate { value: String },

    #[error("timestamp must contain '-'-separated integer year, month and day: '{value}'")]
    MalformedTimestamp { value: String },
    #[error("date must be a valid calendar date in YYYY-MM-DD form: '{value}'")]
    InvalidCalendarDate { value: String },

    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Failure to turn an API payload into typed records.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {index} is invalid: {source}")]
    Record {
        index: usize,
        #[source]
        source: ValidationError,
    },
}
