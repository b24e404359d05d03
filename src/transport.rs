//! Transport adapter: request encoding and submission.
//!
//! Encodes a sealed submission into the verification API's request body
//! (base64 text fields plus transaction metadata) and posts it. The HTTP
//! client is injected via configuration; nothing here is discovered at
//! runtime.

use crate::pipeline::Submission;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Verification API endpoint URL
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransportConfig {
    /// Create a new transport configuration.
    pub fn new(api_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs,
        }
    }
}

/// Transport error types.
#[derive(Debug)]
pub enum TransportError {
    /// Configuration error
    Config(String),
    /// Network/HTTP error
    Network(String),
    /// Server returned an error response
    Server { status: u16, message: String },
    /// JSON encoding/decoding error
    Serialization(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Config(msg) => write!(f, "transport config error: {msg}"),
            TransportError::Network(msg) => write!(f, "transport network error: {msg}"),
            TransportError::Server { status, message } => {
                write!(f, "transport server error ({status}): {message}")
            }
            TransportError::Serialization(msg) => {
                write!(f, "transport serialization error: {msg}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Request body for the verification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Base64 ciphertext
    pub encrypted_payload: String,
    /// Base64 authentication tag
    pub auth_tag: String,
    /// Base64 initialization vector
    pub iv: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Transaction identifier string
    pub transaction_id: String,
}

impl SubmissionRequest {
    /// Encode a sealed submission into transport form.
    pub fn encode(submission: &Submission) -> Self {
        Self {
            encrypted_payload: BASE64.encode(&submission.sealed.ciphertext),
            auth_tag: BASE64.encode(submission.sealed.auth_tag),
            iv: BASE64.encode(submission.sealed.iv),
            timestamp: submission.timestamp_millis / 1000,
            transaction_id: submission.transaction_id.clone(),
        }
    }
}

/// Response body from the verification endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionResponse {
    /// Follow-up URL for the verification webview, when the server issues one
    pub verification_webview_url: Option<String>,
}

/// Async client for the verification API.
#[cfg(feature = "transport")]
pub struct TransportClient {
    config: TransportConfig,
    client: reqwest::Client,
}

#[cfg(feature = "transport")]
impl TransportClient {
    /// Create a new transport client.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Submit a sealed payload and return the server's response.
    pub async fn submit(
        &self,
        submission: &Submission,
    ) -> Result<SubmissionResponse, TransportError> {
        let request = SubmissionRequest::encode(submission);

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::Serialization(e.to_string()))
    }
}

/// Blocking client for synchronous contexts.
#[cfg(feature = "transport")]
pub struct BlockingTransportClient {
    inner: TransportClient,
    runtime: tokio::runtime::Runtime,
}

#[cfg(feature = "transport")]
impl BlockingTransportClient {
    /// Create a new blocking transport client.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Config(format!("failed to create runtime: {e}")))?;

        Ok(Self {
            inner: TransportClient::new(config)?,
            runtime,
        })
    }

    /// Submit a sealed payload and return the server's response.
    pub fn submit(&self, submission: &Submission) -> Result<SubmissionResponse, TransportError> {
        self.runtime.block_on(self.inner.submit(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::SealedPayload;

    fn test_submission() -> Submission {
        Submission {
            sealed: SealedPayload {
                ciphertext: vec![0x01, 0x02, 0x03],
                auth_tag: [0xAA; 16],
                iv: [0xBB; 12],
            },
            transaction_id: "11111111-2222-3333-4444-555555555555".to_string(),
            timestamp_millis: 1_700_000_000_250,
        }
    }

    #[test]
    fn test_request_encoding() {
        let request = SubmissionRequest::encode(&test_submission());

        assert_eq!(request.encrypted_payload, "AQID");
        assert_eq!(request.auth_tag, BASE64.encode([0xAA; 16]));
        assert_eq!(request.iv, BASE64.encode([0xBB; 12]));
        assert_eq!(request.timestamp, 1_700_000_000);
        assert_eq!(
            request.transaction_id,
            "11111111-2222-3333-4444-555555555555"
        );
    }

    #[test]
    fn test_request_field_names() {
        let request = SubmissionRequest::encode(&test_submission());
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"encrypted_payload\""));
        assert!(json.contains("\"auth_tag\""));
        assert!(json.contains("\"iv\""));
        assert!(json.contains("\"timestamp\":1700000000"));
        assert!(json.contains("\"transaction_id\""));
    }

    #[test]
    fn test_response_parsing() {
        let with_url: SubmissionResponse =
            serde_json::from_str(r#"{"verification_webview_url":"https://example.com/v"}"#)
                .unwrap();
        assert_eq!(
            with_url.verification_webview_url.as_deref(),
            Some("https://example.com/v")
        );

        let without: SubmissionResponse = serde_json::from_str("{}").unwrap();
        assert!(without.verification_webview_url.is_none());
    }
}
