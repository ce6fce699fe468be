use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing endpoint (set --endpoint or provide in config).")]
    MissingEndpoint,
    #[error("Missing protection policy (set --policy or provide in config).")]
    MissingPolicy,
    #[error("Missing username (set --username or provide in config).")]
    MissingUsername,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
