use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Failed to read source file '{path}': {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Source file '{path}' produced an empty payload.")]
    EmptySource { path: PathBuf },
    #[error("Invalid generator pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: &'static str,
        #[source]
        source: rand_regex::Error,
    },
    #[error("Revealed payload is not valid base64: {source}")]
    DecodeRevealed {
        #[source]
        source: base64::DecodeError,
    },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
