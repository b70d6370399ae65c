//! HTTP transport seam for skill calls.
//!
//! The dispatcher only needs "POST this JSON with this bearer token, give
//! me the status and body text". Keeping that behind a trait lets tests
//! count calls and script failures without a server.

use std::time::Duration;

use serde_json::Value;

use super::config::SkillsTimeouts;
use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS, TLS, timeout or body-read failure.
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_TRANSPORT_REQUEST",
            Self::ClientBuild(_) => "E_TRANSPORT_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

/// Raw HTTP response: status plus the full body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait SkillTransport: Send + Sync {
    /// POST `body` as JSON to `url` with bearer authorization.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when no HTTP response was obtained.
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<TransportResponse, TransportError>;
}

// =============================================================================
// REQWEST
// =============================================================================

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the TLS backend fails to initialise.
    pub fn new(timeouts: SkillsTimeouts) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl SkillTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}
