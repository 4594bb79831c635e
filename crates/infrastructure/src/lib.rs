//! Apiprobe Infrastructure - Adapters and validator checks
//!
//! This crate provides the concrete transport implementation of the
//! application layer's [`apiprobe_application::ports::HttpClient`] port and
//! the response validator checks run after each send.

pub mod adapters;
pub mod checks;

pub use adapters::ReqwestHttpClient;
