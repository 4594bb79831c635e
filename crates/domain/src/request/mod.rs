//! Captured request types

mod method;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use method::{HttpMethod, UnsupportedMethod};

/// Immutable snapshot of the most recently dispatched HTTP request.
///
/// Stored for post-hoc inspection only (for example, verifying which method
/// was used); it is never re-dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    method: HttpMethod,
    url: String,
    headers: HashMap<String, String>,
}

impl CapturedRequest {
    /// Creates a snapshot of a dispatched request.
    #[must_use]
    pub const fn new(method: HttpMethod, url: String, headers: HashMap<String, String>) -> Self {
        Self {
            method,
            url,
            headers,
        }
    }

    /// The HTTP method that was used.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// The full target URL, including the encoded query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The headers that were applied to the request.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}
