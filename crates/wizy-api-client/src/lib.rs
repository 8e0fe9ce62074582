//! HTTP client for the Wizy upload service.
//!
//! Provides a minimal client with an optional request timeout, a generic GET helper,
//! a multipart POST that hands back the raw status and body, and domain methods
//! (video upload, health check). The runner CLI uses this client directly.

pub mod api;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::time::Duration;
use wizy_core::{TransportErrorKind, UploadError, UploadResult, UploadTestConfig};

/// Status code and body of a response, before any judgement is made on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// The upload service signals success with exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: DeserializeOwned>(&self) -> UploadResult<T> {
        serde_json::from_str(&self.body).map_err(|e| UploadError::MalformedResponse {
            status: self.status,
            reason: e.to_string(),
        })
    }
}

/// HTTP client for the upload service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> UploadResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            UploadError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &UploadTestConfig) -> UploadResult<Self> {
        Self::new(config.timeout_seconds.map(Duration::from_secs))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// GET request. Any non-2xx status is an error; the body is deserialized as JSON.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> UploadResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let raw = read_response(response).await?;
        if !(200..300).contains(&raw.status) {
            return Err(UploadError::UnexpectedStatus {
                status: raw.status,
                body: raw.body,
            });
        }

        raw.json()
    }

    /// POST multipart form. The status is not interpreted here.
    pub async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> UploadResult<RawResponse> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> UploadResult<RawResponse> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport_error)?;
    Ok(RawResponse { status, body })
}

pub fn classify(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    }
}

/// reqwest's top-level message hides the cause ("error sending request"), so
/// the whole source chain goes into the message.
pub fn transport_error(err: reqwest::Error) -> UploadError {
    let kind = classify(&err);
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    UploadError::transport(kind, message)
}

// Re-export domain types for convenience.
pub use wizy_core::models::{HealthResponse, UploadRequest, UploadResponse, UploadedVideo};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_200_is_ok() {
        let ok = RawResponse {
            status: 200,
            body: String::new(),
        };
        let created = RawResponse {
            status: 201,
            body: String::new(),
        };
        assert!(ok.is_ok());
        assert!(!created.is_ok());
    }

    #[test]
    fn json_failure_is_malformed_response() {
        let raw = RawResponse {
            status: 200,
            body: "not json".to_string(),
        };
        let err = raw.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(
            err,
            UploadError::MalformedResponse { status: 200, .. }
        ));
    }

    #[test]
    fn client_remembers_timeout() {
        let client = ApiClient::new(Some(Duration::from_secs(120))).unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_secs(120)));
        let unbounded = ApiClient::new(None).unwrap();
        assert_eq!(unbounded.timeout(), None);
    }
}
