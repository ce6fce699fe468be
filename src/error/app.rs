use thiserror::Error;

use super::{ClientError, ConfigError, HarnessError, ValidationError, WorkloadError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),
    #[error("Harness error: {0}")]
    Harness(#[from] HarnessError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn workload<E>(error: E) -> Self
    where
        E: Into<WorkloadError>,
    {
        error.into().into()
    }

    pub fn harness<E>(error: E) -> Self
    where
        E: Into<HarnessError>,
    {
        error.into().into()
    }

    pub fn client<E>(error: E) -> Self
    where
        E: Into<ClientError>,
    {
        error.into().into()
    }
}
