//! Apiprobe Application - Scenario session and ports
//!
//! This crate owns the per-scenario [`session::Session`] and the
//! [`ports::HttpClient`] trait it dispatches through, keeping the core
//! independent of any specific HTTP library.

pub mod ports;
pub mod session;

pub use ports::{HttpClient, HttpClientError, RequestPlan};
pub use session::{Session, SessionConfig};
