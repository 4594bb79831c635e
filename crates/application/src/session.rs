//! Scenario-scoped request session
//!
//! A [`Session`] accumulates request configuration across steps, then
//! materializes and dispatches exactly one HTTP request at a time,
//! capturing its result for the validator checks to read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use apiprobe_domain::{AssertError, CapturedRequest, CapturedResponse, HttpMethod};
use url::Url;

use crate::ports::{HttpClient, HttpClientError, RequestPlan};

/// The conventional default location for JSON schema files.
const DEFAULT_SCHEMAS_DIR: &str = "schemas";

/// Connection settings for a session, supplied once at construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    base_url: String,
    schemas_dir: PathBuf,
    debug: bool,
}

impl SessionConfig {
    /// Creates a configuration targeting `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            schemas_dir: PathBuf::from(DEFAULT_SCHEMAS_DIR),
            debug: false,
        }
    }

    /// Rebinds the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enables or disables the debug request/response dumps.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the root directory for JSON schema files.
    #[must_use]
    pub fn with_schemas_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schemas_dir = dir.into();
        self
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The root directory schema-relative paths are joined against.
    #[must_use]
    pub fn schemas_dir(&self) -> &Path {
        &self.schemas_dir
    }

    /// Whether debug dumps are enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }
}

/// Per-scenario holder of request configuration and the most recent
/// request/response pair.
///
/// A session is exclusively owned by the scenario that created it; nothing
/// is shared, so no locking is needed. [`Session::reset`] must run before
/// each scenario.
pub struct Session {
    config: SessionConfig,
    client: Arc<dyn HttpClient>,
    headers: HashMap<String, String>,
    query_params: HashMap<String, String>,
    last_request: Option<CapturedRequest>,
    last_response: Option<CapturedResponse>,
}

impl Session {
    /// Creates a session dispatching through `client`.
    #[must_use]
    pub fn new(config: SessionConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            headers: HashMap::new(),
            query_params: HashMap::new(),
            last_request: None,
            last_response: None,
        }
    }

    /// The session's configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Upserts a request header. Last write per name wins.
    ///
    /// Header legality is not validated here; that is the transport's job.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Upserts several request headers at once.
    pub fn set_headers<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.set_header(name, value);
        }
    }

    /// Upserts a query parameter. Last write per name wins.
    pub fn set_query_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(name.into(), value.into());
    }

    /// Upserts several query parameters at once.
    pub fn set_query_params<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.set_query_param(name, value);
        }
    }

    /// The currently accumulated headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The currently accumulated query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Sends a bodyless request to `base_url + path`.
    ///
    /// Blocks the scenario until the full response body is read, then
    /// replaces the captured request/response pair. On failure nothing is
    /// stored and any previously captured pair is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpClientError`] on URL or transport failure.
    pub async fn send(&mut self, method: HttpMethod, path: &str) -> Result<(), HttpClientError> {
        self.dispatch(method, path, None).await
    }

    /// Sends a request carrying `body` as a raw literal payload.
    ///
    /// The body is typically JSON text; Content-Type is whatever the caller
    /// set via [`Session::set_header`], never auto-inferred.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpClientError`] on URL or transport failure.
    pub async fn send_with_body(
        &mut self,
        method: HttpMethod,
        path: &str,
        body: impl Into<String>,
    ) -> Result<(), HttpClientError> {
        self.dispatch(method, path, Some(body.into())).await
    }

    async fn dispatch(
        &mut self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<(), HttpClientError> {
        let url = self.build_url(path)?;
        let plan = RequestPlan {
            method,
            url,
            headers: self.headers.clone(),
            body,
        };

        if self.config.debug {
            tracing::info!(
                method = %plan.method,
                url = %plan.url,
                headers = ?plan.headers,
                body = plan.body.as_deref().unwrap_or(""),
                "outgoing request"
            );
        }

        let response = self.client.execute(&plan).await?;

        if self.config.debug {
            tracing::info!(
                status = response.status(),
                headers = ?response.headers(),
                body = %response.body_text(),
                "incoming response"
            );
        }

        self.last_request = Some(CapturedRequest::new(
            plan.method,
            plan.url.to_string(),
            plan.headers,
        ));
        self.last_response = Some(response);

        Ok(())
    }

    fn build_url(&self, path: &str) -> Result<Url, HttpClientError> {
        let raw = format!("{}{}", self.config.base_url, path);
        let mut url =
            Url::parse(&raw).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {raw}")))?;

        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query_params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    /// The most recently captured response.
    ///
    /// # Errors
    ///
    /// Returns [`AssertError::NoResponse`] when no send has completed yet.
    pub fn response(&self) -> Result<&CapturedResponse, AssertError> {
        self.last_response.as_ref().ok_or(AssertError::NoResponse)
    }

    /// The most recently dispatched request, for post-hoc inspection.
    #[must_use]
    pub const fn request(&self) -> Option<&CapturedRequest> {
        self.last_request.as_ref()
    }

    /// Returns the session to a clean slate between scenarios.
    ///
    /// Idempotent: headers and query parameters become empty maps and both
    /// captured values are cleared.
    pub fn reset(&mut self) {
        self.headers = HashMap::new();
        self.query_params = HashMap::new();
        self.last_request = None;
        self.last_response = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("headers", &self.headers)
            .field("query_params", &self.query_params)
            .field("last_request", &self.last_request)
            .field("last_response", &self.last_response)
            .finish_non_exhaustive()
    }
}
