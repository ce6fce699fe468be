use std::fmt;

use thiserror::Error;

/// The four fixed REST operations exposed by the protection service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Protect,
    ProtectBulk,
    Reveal,
    RevealBulk,
}

impl Operation {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Operation::Protect => "/v1/protect",
            Operation::ProtectBulk => "/v1/protectbulk",
            Operation::Reveal => "/v1/reveal",
            Operation::RevealBulk => "/v1/revealbulk",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Protect => "protect",
            Operation::ProtectBulk => "protect-bulk",
            Operation::Reveal => "reveal",
            Operation::RevealBulk => "reveal-bulk",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint host '{host}': {source}")]
    InvalidEndpoint {
        host: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Endpoint host '{host}' must not contain a path, query, or credentials.")]
    EndpointNotBareHost { host: String },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("  --> {operation} request to {endpoint} failed: {source}")]
    Transport {
        operation: Operation,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(
        "  --> {operation} Status Code: {status} ({endpoint})\n   Reason: {reason}\n   Error: {body}"
    )]
    Status {
        operation: Operation,
        endpoint: String,
        status: u16,
        reason: String,
        body: String,
    },
    #[error(
        "  --> {operation} response from {endpoint} was not valid JSON: {source}\n   Body: {body}"
    )]
    Decode {
        operation: Operation,
        endpoint: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("  --> {operation} response is missing field '{field}'.")]
    MissingField {
        operation: Operation,
        field: &'static str,
    },
    #[error("  --> {operation} returned {actual} records for {expected} submitted.")]
    CountMismatch {
        operation: Operation,
        expected: usize,
        actual: usize,
    },
    #[error(
        "  --> protect-bulk returned mixed external versions ('{first}' at 0, '{other}' at {index})."
    )]
    MixedVersions {
        first: String,
        other: String,
        index: usize,
    },
}

impl ClientError {
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::InvalidEndpoint { .. }
            | ClientError::EndpointNotBareHost { .. }
            | ClientError::BuildClient { .. }
            | ClientError::Transport { .. }
            | ClientError::Decode { .. }
            | ClientError::MissingField { .. }
            | ClientError::CountMismatch { .. }
            | ClientError::MixedVersions { .. } => None,
        }
    }
}
