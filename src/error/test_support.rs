use super::{ConfigError, HarnessError, ValidationError, WorkloadError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for WorkloadError {
    fn from(message: &'static str) -> Self {
        WorkloadError::TestExpectation { message }
    }
}

impl From<String> for WorkloadError {
    fn from(value: String) -> Self {
        WorkloadError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for HarnessError {
    fn from(message: &'static str) -> Self {
        HarnessError::TestExpectation { message }
    }
}

impl From<String> for HarnessError {
    fn from(value: String) -> Self {
        HarnessError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
