//! JSON bodies exchanged with the protection service.
//!
//! Request types borrow from the caller; response types keep every field
//! optional so a missing field is reported by name instead of as a generic
//! decode failure.
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Operation};

use super::{Protected, ProtectedBatch};

#[derive(Debug, Serialize)]
pub(crate) struct ProtectRequest<'body> {
    pub(crate) protection_policy_name: &'body str,
    pub(crate) data: &'body str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProtectBulkRequest<'body> {
    pub(crate) protection_policy_name: &'body str,
    pub(crate) data_array: &'body [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct RevealRequest<'body> {
    pub(crate) protection_policy_name: &'body str,
    pub(crate) external_version: &'body str,
    pub(crate) username: &'body str,
    pub(crate) protected_data: &'body str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RevealBulkRequest<'body> {
    pub(crate) protection_policy_name: &'body str,
    pub(crate) username: &'body str,
    pub(crate) protected_data_array: Vec<ProtectedRecordRef<'body>>,
}

/// One element of a bulk reveal request. The service expects the same shape
/// it returned from bulk protect.
#[derive(Debug, Serialize)]
pub(crate) struct ProtectedRecordRef<'body> {
    pub(crate) protected_data: &'body str,
    pub(crate) external_version: &'body str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProtectResponse {
    protected_data: Option<String>,
    external_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProtectBulkResponse {
    protected_data_array: Option<Vec<ProtectedRecord>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProtectedRecord {
    protected_data: Option<String>,
    external_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevealResponse {
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevealBulkResponse {
    data_array: Option<Vec<RevealedRecord>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevealedRecord {
    data: Option<String>,
}

fn required<T>(
    value: Option<T>,
    operation: Operation,
    field: &'static str,
) -> Result<T, ClientError> {
    value.ok_or(ClientError::MissingField { operation, field })
}

impl ProtectResponse {
    pub(crate) fn into_protected(self) -> Result<Protected, ClientError> {
        Ok(Protected {
            ciphertext: required(self.protected_data, Operation::Protect, "protected_data")?,
            version: required(self.external_version, Operation::Protect, "external_version")?,
        })
    }
}

impl ProtectBulkResponse {
    /// Converts the response into ciphertexts plus the batch version.
    ///
    /// The batch version is taken from the first element; every other element
    /// must carry the same value.
    pub(crate) fn into_batch(self, expected: usize) -> Result<ProtectedBatch, ClientError> {
        let operation = Operation::ProtectBulk;
        let records = required(self.protected_data_array, operation, "protected_data_array")?;
        if records.len() != expected {
            return Err(ClientError::CountMismatch {
                operation,
                expected,
                actual: records.len(),
            });
        }

        let mut ciphertexts = Vec::with_capacity(records.len());
        let mut version: Option<String> = None;
        for (index, record) in records.into_iter().enumerate() {
            ciphertexts.push(required(record.protected_data, operation, "protected_data")?);
            let record_version = required(record.external_version, operation, "external_version")?;
            match version.as_deref() {
                None => version = Some(record_version),
                Some(first) if first == record_version => {}
                Some(first) => {
                    return Err(ClientError::MixedVersions {
                        first: first.to_owned(),
                        other: record_version,
                        index,
                    });
                }
            }
        }

        Ok(ProtectedBatch {
            ciphertexts,
            version: required(version, operation, "external_version")?,
        })
    }
}

impl RevealResponse {
    pub(crate) fn into_plaintext(self) -> Result<String, ClientError> {
        required(self.data, Operation::Reveal, "data")
    }
}

impl RevealBulkResponse {
    pub(crate) fn into_plaintexts(self, expected: usize) -> Result<Vec<String>, ClientError> {
        let operation = Operation::RevealBulk;
        let records = required(self.data_array, operation, "data_array")?;
        if records.len() != expected {
            return Err(ClientError::CountMismatch {
                operation,
                expected,
                actual: records.len(),
            });
        }
        records
            .into_iter()
            .map(|record| required(record.data, operation, "data"))
            .collect()
    }
}
