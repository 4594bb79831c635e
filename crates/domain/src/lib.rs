//! Apiprobe Domain - Core harness types
//!
//! This crate defines the domain model for the apiprobe HTTP assertion
//! harness: captured requests and responses, JSON path evaluation and
//! structural comparison, and the assertion error taxonomy. All types
//! here are pure Rust with no I/O dependencies.

pub mod error;
pub mod json;
pub mod request;
pub mod response;

pub use error::{AssertError, AssertResult};
pub use json::path::PathError;
pub use request::{CapturedRequest, HttpMethod};
pub use response::CapturedResponse;
