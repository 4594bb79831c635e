//! Assertion error taxonomy

use std::path::PathBuf;

use thiserror::Error;

use crate::json::path::PathError;

/// Errors produced when a response assertion cannot be confirmed.
///
/// Every variant carries enough context for an operator to diagnose the
/// failure without re-running the scenario: mismatches always include both
/// expected and actual values, parse failures include the offending text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertError {
    /// An assertion was attempted before any request was dispatched.
    #[error("no response captured; send a request before asserting")]
    NoResponse,

    /// A body or expected literal is not well-formed JSON.
    #[error("invalid JSON: {reason}; offending text: {text}")]
    Parse {
        /// The text that failed to parse.
        text: String,
        /// The parser's diagnostic.
        reason: String,
    },

    /// A JSON path expression could not be evaluated against the document.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An expected literal could not be coerced to the resolved value's kind.
    #[error("cannot parse expected value {text:?} as {kind}")]
    Coercion {
        /// The expected literal as supplied by the caller.
        text: String,
        /// The JSON kind of the value located in the document.
        kind: &'static str,
    },

    /// A regular expression supplied to a check is invalid.
    #[error("invalid regular expression {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The regex compiler's diagnostic.
        reason: String,
    },

    /// The referenced JSON schema file does not exist.
    #[error("JSON schema file does not exist: {path}")]
    SchemaNotFound {
        /// The resolved schema path.
        path: PathBuf,
    },

    /// The referenced JSON schema file exists but cannot be used.
    #[error("cannot read JSON schema file {path}: {reason}")]
    SchemaUnreadable {
        /// The resolved schema path.
        path: PathBuf,
        /// What went wrong while reading or compiling it.
        reason: String,
    },

    /// The response body does not conform to the schema.
    #[error("response does not conform to schema {schema:?}: {}", violations.join("; "))]
    SchemaViolations {
        /// Schema path relative to the schemas directory.
        schema: String,
        /// Every violation reported by the validator, not just the first.
        violations: Vec<String>,
    },

    /// Values resolved successfully but differ from the expectation.
    #[error("{context}: expected {expected}, actual {actual}")]
    Mismatch {
        /// What was being compared.
        context: String,
        /// The expected value, rendered for display.
        expected: String,
        /// The actual value, rendered for display.
        actual: String,
    },
}

/// Result type alias for assertion checks.
pub type AssertResult<T> = Result<T, AssertError>;
