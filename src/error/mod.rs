mod app;
mod client;
mod config;
mod harness;
mod validation;
mod workload;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use client::{ClientError, Operation};
pub use config::ConfigError;
pub use harness::HarnessError;
pub use validation::ValidationError;
pub use workload::WorkloadError;
