//! Ports abstracting the outside world away from the session.

mod http_client;

pub use http_client::{HttpClient, HttpClientError, RequestPlan};
