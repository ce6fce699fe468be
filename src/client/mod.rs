//! REST client for the four fixed protection-service operations.
mod wire;


use std::time::Duration;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{ClientError, Operation};

use wire::{
    ProtectBulkRequest, ProtectBulkResponse, ProtectRequest, ProtectResponse, ProtectedRecordRef,
    RevealBulkRequest, RevealBulkResponse, RevealRequest, RevealResponse,
};

/// Upper bound for a single call. Large bulk batches can take minutes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Ciphertext and the external version needed to reveal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protected {
    pub ciphertext: String,
    pub version: String,
}

/// Result of a bulk protect: one ciphertext per submitted record and the
/// version shared by the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBatch {
    pub ciphertexts: Vec<String>,
    pub version: String,
}

/// The protect/reveal operations the harness drives.
///
/// # Errors
///
/// Every operation fails on a transport error, a non-200 status, or a
/// response missing the expected fields.
#[async_trait]
pub trait ProtectionApi {
    /// # Errors
    ///
    /// See the trait documentation.
    async fn protect(&self, plaintext: &str, policy: &str) -> Result<Protected, ClientError>;

    /// # Errors
    ///
    /// Also fails when the response count or versions do not line up with
    /// the request.
    async fn protect_bulk(
        &self,
        plaintexts: &[String],
        policy: &str,
    ) -> Result<ProtectedBatch, ClientError>;

    /// # Errors
    ///
    /// See the trait documentation.
    async fn reveal(
        &self,
        ciphertext: &str,
        policy: &str,
        version: &str,
        username: &str,
    ) -> Result<String, ClientError>;

    /// # Errors
    ///
    /// Also fails when the response count differs from the request.
    async fn reveal_bulk(
        &self,
        ciphertexts: &[String],
        policy: &str,
        version: &str,
        username: &str,
    ) -> Result<Vec<String>, ClientError>;
}

#[derive(Debug, Clone)]
struct Endpoints {
    protect: Url,
    protect_bulk: Url,
    reveal: Url,
    reveal_bulk: Url,
}

impl Endpoints {
    fn for_host(host: &str) -> Result<Self, ClientError> {
        let base = Url::parse(&format!("http://{}", host)).map_err(|err| {
            ClientError::InvalidEndpoint {
                host: host.to_owned(),
                source: err,
            }
        })?;
        if base.path() != "/"
            || base.query().is_some()
            || base.fragment().is_some()
            || !base.username().is_empty()
        {
            return Err(ClientError::EndpointNotBareHost {
                host: host.to_owned(),
            });
        }
        let join = |operation: Operation| {
            base.join(operation.path())
                .map_err(|err| ClientError::InvalidEndpoint {
                    host: host.to_owned(),
                    source: err,
                })
        };
        Ok(Self {
            protect: join(Operation::Protect)?,
            protect_bulk: join(Operation::ProtectBulk)?,
            reveal: join(Operation::Reveal)?,
            reveal_bulk: join(Operation::RevealBulk)?,
        })
    }

    const fn get(&self, operation: Operation) -> &Url {
        match operation {
            Operation::Protect => &self.protect,
            Operation::ProtectBulk => &self.protect_bulk,
            Operation::Reveal => &self.reveal,
            Operation::RevealBulk => &self.reveal_bulk,
        }
    }
}

/// HTTP client bound to one protection-service host.
///
/// Certificate validation is disabled: the target is a local or internal
/// service the operator already trusts.
#[derive(Debug, Clone)]
pub struct ProtectionClient {
    http: Client,
    endpoints: Endpoints,
}

impl ProtectionClient {
    /// Builds a client for `host` (hostname or IP with optional port).
    ///
    /// # Errors
    ///
    /// Returns an error when the host does not form a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(host: &str) -> Result<Self, ClientError> {
        let endpoints = Endpoints::for_host(host)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|err| ClientError::BuildClient { source: err })?;
        Ok(Self { http, endpoints })
    }

    #[must_use]
    pub const fn endpoint(&self, operation: Operation) -> &Url {
        self.endpoints.get(operation)
    }

    async fn post<B, R>(&self, operation: Operation, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoints.get(operation);
        let endpoint = url.as_str();
        let transport = |err: reqwest::Error| ClientError::Transport {
            operation,
            endpoint: endpoint.to_owned(),
            source: err,
        };

        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let reason = reason_phrase(&response);
        let text = response.text().await.map_err(transport)?;
        debug!("{} -> {} ({} bytes)", endpoint, status, text.len());

        if status != StatusCode::OK {
            return Err(ClientError::Status {
                operation,
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
                reason,
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| ClientError::Decode {
            operation,
            endpoint: endpoint.to_owned(),
            body: text,
            source: err,
        })
    }
}

/// Reason phrase as sent by the server. hyper only keeps the raw phrase when
/// it differs from the canonical one for the status code.
fn reason_phrase(response: &Response) -> String {
    response.extensions().get::<ReasonPhrase>().map_or_else(
        || {
            response
                .status()
                .canonical_reason()
                .map_or_else(String::new, str::to_owned)
        },
        |phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
    )
}

#[async_trait]
impl ProtectionApi for ProtectionClient {
    async fn protect(&self, plaintext: &str, policy: &str) -> Result<Protected, ClientError> {
        let body = ProtectRequest {
            protection_policy_name: policy,
            data: plaintext,
        };
        let response: ProtectResponse = self.post(Operation::Protect, &body).await?;
        response.into_protected()
    }

    async fn protect_bulk(
        &self,
        plaintexts: &[String],
        policy: &str,
    ) -> Result<ProtectedBatch, ClientError> {
        let body = ProtectBulkRequest {
            protection_policy_name: policy,
            data_array: plaintexts,
        };
        let response: ProtectBulkResponse = self.post(Operation::ProtectBulk, &body).await?;
        response.into_batch(plaintexts.len())
    }

    async fn reveal(
        &self,
        ciphertext: &str,
        policy: &str,
        version: &str,
        username: &str,
    ) -> Result<String, ClientError> {
        let body = RevealRequest {
            protection_policy_name: policy,
            external_version: version,
            username,
            protected_data: ciphertext,
        };
        let response: RevealResponse = self.post(Operation::Reveal, &body).await?;
        response.into_plaintext()
    }

    async fn reveal_bulk(
        &self,
        ciphertexts: &[String],
        policy: &str,
        version: &str,
        username: &str,
    ) -> Result<Vec<String>, ClientError> {
        let body = RevealBulkRequest {
            protection_policy_name: policy,
            username,
            protected_data_array: ciphertexts
                .iter()
                .map(|ciphertext| ProtectedRecordRef {
                    protected_data: ciphertext,
                    external_version: version,
                })
                .collect(),
        };
        let response: RevealBulkResponse = self.post(Operation::RevealBulk, &body).await?;
        response.into_plaintexts(ciphertexts.len())
    }
}
