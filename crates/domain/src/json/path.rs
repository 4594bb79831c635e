//! JSON path evaluation
//!
//! Evaluates a JSONPath-style query expression against a decoded document.
//! Supported syntax: `$`, `$.field`, `$.field.nested`, `$.array[0]`,
//! `$[0]`, and chained indices such as `$.matrix[1][2]`.
//!
//! Resolution and absence are kept distinct: a path that lands on an
//! existing key holding JSON `null` resolves to that `null`, while a
//! missing key or out-of-range index is `PathError::NotFound`.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while evaluating a JSON path expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The expression itself is not valid path syntax.
    #[error("malformed JSON path {expr:?}: {reason}")]
    Malformed {
        /// The expression as supplied.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The expression is valid but does not resolve against the document.
    #[error("JSON path {expr:?} did not resolve against the document")]
    NotFound {
        /// The expression as supplied.
        expr: String,
    },

    /// The expression resolved to a value of the wrong kind for the check.
    #[error("JSON path {expr:?} resolved to {found} where {expected} was required")]
    UnexpectedType {
        /// The expression as supplied.
        expr: String,
        /// The kind the check required.
        expected: &'static str,
        /// The kind actually found.
        found: &'static str,
    },
}

impl PathError {
    fn malformed(expr: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }

    fn not_found(expr: &str) -> Self {
        Self::NotFound {
            expr: expr.to_string(),
        }
    }
}

/// Evaluates `expr` against `document`, borrowing the located value.
///
/// # Errors
///
/// Returns [`PathError::Malformed`] for invalid syntax and
/// [`PathError::NotFound`] when any step of the traversal finds nothing.
pub fn evaluate<'a>(document: &'a Value, expr: &str) -> Result<&'a Value, PathError> {
    let trimmed = expr.trim();
    let Some(rest) = trimmed.strip_prefix('$') else {
        return Err(PathError::malformed(expr, "must start with '$'"));
    };

    if rest.is_empty() {
        return Ok(document);
    }

    let body = if let Some(after_dot) = rest.strip_prefix('.') {
        if after_dot.is_empty() {
            return Err(PathError::malformed(expr, "trailing '.'"));
        }
        after_dot
    } else if rest.starts_with('[') {
        rest
    } else {
        return Err(PathError::malformed(expr, "expected '.' or '[' after '$'"));
    };

    let mut current = document;
    for segment in split_segments(expr, body)? {
        current = resolve_segment(expr, current, segment)?;
    }

    Ok(current)
}

/// Splits the path body on dots that sit outside index brackets.
fn split_segments<'e>(expr: &str, body: &'e str) -> Result<Vec<&'e str>, PathError> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_bracket = false;

    for (offset, ch) in body.char_indices() {
        match ch {
            '[' if in_bracket => {
                return Err(PathError::malformed(expr, "nested '[' in index"));
            }
            '[' => in_bracket = true,
            ']' if !in_bracket => {
                return Err(PathError::malformed(expr, "unbalanced ']'"));
            }
            ']' => in_bracket = false,
            '.' if !in_bracket => {
                if offset == start {
                    return Err(PathError::malformed(expr, "empty path segment"));
                }
                segments.push(&body[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }

    if in_bracket {
        return Err(PathError::malformed(expr, "unterminated index"));
    }
    if start == body.len() {
        return Err(PathError::malformed(expr, "empty path segment"));
    }
    segments.push(&body[start..]);

    Ok(segments)
}

/// Resolves one segment: an optional key name followed by index groups.
fn resolve_segment<'a>(
    expr: &str,
    current: &'a Value,
    segment: &str,
) -> Result<&'a Value, PathError> {
    let (name, mut indices) = match segment.find('[') {
        Some(bracket) => (&segment[..bracket], &segment[bracket..]),
        None => (segment, ""),
    };

    if name.is_empty() && indices.is_empty() {
        return Err(PathError::malformed(expr, "empty path segment"));
    }

    let mut value = current;
    if !name.is_empty() {
        value = value.get(name).ok_or_else(|| PathError::not_found(expr))?;
    }

    while !indices.is_empty() {
        let Some(end) = indices.find(']') else {
            return Err(PathError::malformed(expr, "unterminated index"));
        };
        let digits = &indices[1..end];
        let index: usize = digits
            .parse()
            .map_err(|_| PathError::malformed(expr, format!("invalid array index {digits:?}")))?;
        value = value.get(index).ok_or_else(|| PathError::not_found(expr))?;
        indices = &indices[end + 1..];
        if !indices.is_empty() && !indices.starts_with('[') {
            return Err(PathError::malformed(expr, "unexpected text after index"));
        }
    }

    Ok(value)
}
