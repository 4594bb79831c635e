//! HTTP Client port

use std::collections::HashMap;

use apiprobe_domain::{CapturedResponse, HttpMethod};
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A fully materialized request, ready for dispatch.
///
/// The session builds one of these per send: the URL already carries the
/// encoded query string, and the headers are exactly the accumulated
/// scenario headers (no Content-Type inference happens anywhere).
#[derive(Debug, Clone)]
pub struct RequestPlan {
    /// HTTP method to use.
    pub method: HttpMethod,
    /// Full target URL including the query string.
    pub url: Url,
    /// Headers to apply, as accumulated by the scenario.
    pub headers: HashMap<String, String>,
    /// Raw literal request body, if any.
    pub body: Option<String>,
}

/// Transport failures surfaced by an [`HttpClient`].
///
/// None of these are retried; a failed send aborts the current step and the
/// session keeps whatever it captured before.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The target URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Name resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// The host that could not be resolved.
        host: String,
        /// The resolver's diagnostic.
        message: String,
    },

    /// The remote host actively refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// The host that refused.
        host: String,
        /// The port that refused.
        port: u16,
    },

    /// The connection could not be established (TLS, reset, unreachable).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response arrived but its body could not be fully read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// session to be independent of specific HTTP libraries. Implementations
/// must read the entire response body before returning.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes the request and returns the captured response.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpClientError`] when the connection, TLS handshake,
    /// name resolution, or body read fails.
    async fn execute(&self, plan: &RequestPlan) -> Result<CapturedResponse, HttpClientError>;
}
