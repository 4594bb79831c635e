//! Response validator checks.
//!
//! Stateless predicates over a captured response. Each check either
//! succeeds or returns a descriptive [`AssertError`] carrying both the
//! expected and the actual value; nothing is retried or recovered here.

use std::fs;
use std::path::Path;

use apiprobe_domain::json::{self, PathError};
use apiprobe_domain::{AssertError, AssertResult, CapturedResponse};
use regex::Regex;
use serde_json::Value;

/// Checks that the response status code equals `expected`.
///
/// For error-class responses (actual >= 400) the failure message includes
/// the full response body to speed up diagnosis.
///
/// # Errors
///
/// Returns [`AssertError::Mismatch`] on a differing status code.
pub fn status_code_equals(response: &CapturedResponse, expected: u16) -> AssertResult<()> {
    let actual = response.status();
    if actual == expected {
        return Ok(());
    }

    let context = if actual >= 400 {
        format!(
            "status code mismatch (response body: {})",
            response.body_text()
        )
    } else {
        "status code mismatch".to_string()
    };

    Err(mismatch(context, expected.to_string(), actual.to_string()))
}

/// Checks that the response body parses as a JSON value of any shape
/// (object, array, or scalar).
///
/// # Errors
///
/// Returns [`AssertError::Parse`] when the body is not well-formed JSON.
pub fn body_is_valid_json(response: &CapturedResponse) -> AssertResult<()> {
    body_document(response).map(|_| ())
}

/// Checks the response body against an expected JSON literal by deep
/// structural equality.
///
/// Whitespace and object key order are irrelevant, array order is
/// significant, and numbers compare by decoded value.
///
/// # Errors
///
/// Returns [`AssertError::Parse`] when either side is not well-formed JSON
/// and [`AssertError::Mismatch`] listing both raw texts when they differ.
pub fn body_equals_json(response: &CapturedResponse, expected_literal: &str) -> AssertResult<()> {
    let actual_text = trimmed_body(response);
    let actual = parse_json(&actual_text)?;
    let expected = parse_json(expected_literal)?;

    if json::json_eq(&actual, &expected) {
        Ok(())
    } else {
        Err(mismatch(
            "JSON documents differ",
            expected_literal.trim().to_string(),
            actual_text,
        ))
    }
}

/// Checks that the value at `expr` equals `expected_text` after coercing
/// the text into the located value's kind.
///
/// Coercion policy, one rule per JSON kind: booleans parse the text as
/// `true`/`false`, numbers parse it as floating point and compare by
/// value, strings compare directly, and any other kind compares against
/// the value's compact JSON rendering.
///
/// # Errors
///
/// Returns [`AssertError::Parse`] for a non-JSON body,
/// [`AssertError::Path`] when the path does not resolve,
/// [`AssertError::Coercion`] when the text cannot be parsed into the
/// located kind, and [`AssertError::Mismatch`] on a differing value.
#[allow(clippy::float_cmp)]
pub fn json_path_equals(
    response: &CapturedResponse,
    expr: &str,
    expected_text: &str,
) -> AssertResult<()> {
    let document = body_document(response)?;
    let value = json::evaluate(&document, expr)?;
    let context = format!("JSON path {expr:?} value mismatch");

    match value {
        Value::Bool(actual) => {
            let expected: bool = expected_text.parse().map_err(|_| AssertError::Coercion {
                text: expected_text.to_string(),
                kind: "boolean",
            })?;
            if *actual == expected {
                Ok(())
            } else {
                Err(mismatch(context, expected_text, actual.to_string()))
            }
        }
        Value::Number(actual) => {
            let expected: f64 = expected_text.parse().map_err(|_| AssertError::Coercion {
                text: expected_text.to_string(),
                kind: "number",
            })?;
            if actual.as_f64() == Some(expected) {
                Ok(())
            } else {
                Err(mismatch(context, expected_text, actual.to_string()))
            }
        }
        Value::String(actual) => {
            if actual == expected_text {
                Ok(())
            } else {
                Err(mismatch(context, expected_text, actual.clone()))
            }
        }
        other => {
            let rendered = other.to_string();
            if rendered == expected_text {
                Ok(())
            } else {
                Err(mismatch(context, expected_text, rendered))
            }
        }
    }
}

/// Checks that the string value at `expr` matches `pattern`.
///
/// # Errors
///
/// Returns [`AssertError::Path`] when the path does not resolve or the
/// value is not a string, [`AssertError::InvalidPattern`] for a bad
/// pattern, and [`AssertError::Mismatch`] when nothing matches.
pub fn json_path_matches(
    response: &CapturedResponse,
    expr: &str,
    pattern: &str,
) -> AssertResult<()> {
    let document = body_document(response)?;
    let value = json::evaluate(&document, expr)?;

    let Value::String(actual) = value else {
        return Err(AssertError::Path(PathError::UnexpectedType {
            expr: expr.to_string(),
            expected: "string",
            found: json::kind(value),
        }));
    };

    let regex = compile(pattern)?;
    if regex.is_match(actual) {
        Ok(())
    } else {
        Err(mismatch(
            format!("JSON path {expr:?} does not match pattern"),
            pattern,
            actual.clone(),
        ))
    }
}

/// Checks that `expr` resolves to any value, including JSON `null`.
///
/// Only "path does not exist" fails; an existing key holding `null` counts
/// as present (the boundary documented by the domain path evaluator).
///
/// # Errors
///
/// Returns [`AssertError::Parse`] for a non-JSON body and
/// [`AssertError::Path`] when the path does not resolve.
pub fn json_path_is_present(response: &CapturedResponse, expr: &str) -> AssertResult<()> {
    let document = body_document(response)?;
    json::evaluate(&document, expr).map(|_| ()).map_err(Into::into)
}

/// Checks that the array at `expr` has exactly `expected` elements.
///
/// The degenerate path `$` is supported for documents whose root is itself
/// an array.
///
/// # Errors
///
/// Returns [`AssertError::Path`] when the path does not resolve or the
/// value is not an array, and [`AssertError::Mismatch`] on a differing
/// length.
pub fn json_path_has_count(
    response: &CapturedResponse,
    expr: &str,
    expected: usize,
) -> AssertResult<()> {
    let document = body_document(response)?;
    let value = json::evaluate(&document, expr)?;

    let Value::Array(items) = value else {
        return Err(AssertError::Path(PathError::UnexpectedType {
            expr: expr.to_string(),
            expected: "array",
            found: json::kind(value),
        }));
    };

    if items.len() == expected {
        Ok(())
    } else {
        Err(mismatch(
            format!("JSON path {expr:?} element count"),
            expected.to_string(),
            items.len().to_string(),
        ))
    }
}

/// Checks that the trailing-newline-trimmed body contains `needle`.
///
/// # Errors
///
/// Returns [`AssertError::Mismatch`] when the substring is absent.
pub fn body_contains(response: &CapturedResponse, needle: &str) -> AssertResult<()> {
    let body = trimmed_body(response);
    if body.contains(needle) {
        Ok(())
    } else {
        Err(mismatch("body does not contain substring", needle, body))
    }
}

/// Checks the trailing-newline-trimmed body against a regular expression.
///
/// # Errors
///
/// Returns [`AssertError::InvalidPattern`] for a bad pattern and
/// [`AssertError::Mismatch`] when nothing matches.
pub fn body_matches_pattern(response: &CapturedResponse, pattern: &str) -> AssertResult<()> {
    let regex = compile(pattern)?;
    let body = trimmed_body(response);
    if regex.is_match(&body) {
        Ok(())
    } else {
        Err(mismatch("body does not match pattern", pattern, body))
    }
}

/// Checks a response header (case-insensitive lookup) for exact equality.
///
/// An entirely absent header surfaces as an empty-string actual value.
///
/// # Errors
///
/// Returns [`AssertError::Mismatch`] on a differing or missing header.
pub fn header_equals(response: &CapturedResponse, name: &str, expected: &str) -> AssertResult<()> {
    let actual = response.header(name).unwrap_or("");
    if actual == expected {
        Ok(())
    } else {
        Err(mismatch(
            format!("header {name:?} mismatch"),
            expected,
            actual,
        ))
    }
}

/// Validates the response body against a JSON schema file.
///
/// `relative` is trimmed of leading/trailing slashes and joined under
/// `schemas_dir`; no further sandboxing is applied. Every violation the
/// validator finds is collected into the error, not just the first.
///
/// # Errors
///
/// Returns [`AssertError::SchemaNotFound`] when the file is absent,
/// [`AssertError::SchemaUnreadable`] when it cannot be read or compiled,
/// [`AssertError::Parse`] for a non-JSON body, and
/// [`AssertError::SchemaViolations`] when the document fails the schema.
pub fn matches_json_schema(
    response: &CapturedResponse,
    schemas_dir: &Path,
    relative: &str,
) -> AssertResult<()> {
    let relative = relative.trim_matches('/');
    let path = schemas_dir.join(relative);

    if !path.exists() {
        return Err(AssertError::SchemaNotFound { path });
    }

    let contents = fs::read_to_string(&path).map_err(|e| AssertError::SchemaUnreadable {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let schema: Value =
        serde_json::from_str(&contents).map_err(|e| AssertError::SchemaUnreadable {
            path: path.clone(),
            reason: format!("not valid JSON: {e}"),
        })?;
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| AssertError::SchemaUnreadable {
            path: path.clone(),
            reason: format!("invalid schema: {e}"),
        })?;

    let document = body_document(response)?;
    let violations: Vec<String> = validator
        .iter_errors(&document)
        .map(|error| error.to_string())
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AssertError::SchemaViolations {
            schema: relative.to_string(),
            violations,
        })
    }
}

fn trimmed_body(response: &CapturedResponse) -> String {
    response.body_text().trim_end_matches('\n').to_string()
}

fn body_document(response: &CapturedResponse) -> AssertResult<Value> {
    parse_json(&response.body_text())
}

fn parse_json(text: &str) -> AssertResult<Value> {
    serde_json::from_str(text).map_err(|e| AssertError::Parse {
        text: text.to_string(),
        reason: e.to_string(),
    })
}

fn compile(pattern: &str) -> AssertResult<Regex> {
    Regex::new(pattern).map_err(|e| AssertError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn mismatch(
    context: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> AssertError {
    AssertError::Mismatch {
        context: context.into(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn response(status: u16, body: &str) -> CapturedResponse {
        CapturedResponse::new(status, HashMap::new(), body.as_bytes().to_vec())
    }

    fn response_with_header(name: &str, value: &str) -> CapturedResponse {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), value.to_string());
        CapturedResponse::new(200, headers, b"{}".to_vec())
    }

    #[test]
    fn test_status_code_equals() {
        let ok = response(200, r#"{"result":"success"}"#);
        assert!(status_code_equals(&ok, 200).is_ok());

        let err = status_code_equals(&ok, 400).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("200"));
    }

    #[test]
    fn test_status_code_error_class_echoes_body() {
        let not_found = response(404, r#"{"error":"missing user"}"#);
        let message = status_code_equals(&not_found, 200).unwrap_err().to_string();
        assert!(message.contains("missing user"));
    }

    #[test]
    fn test_body_is_valid_json_accepts_any_shape() {
        assert!(body_is_valid_json(&response(200, r#"{"a":1}"#)).is_ok());
        assert!(body_is_valid_json(&response(200, "[1,2]")).is_ok());
        assert!(body_is_valid_json(&response(200, "42")).is_ok());

        let err = body_is_valid_json(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, AssertError::Parse { .. }));
    }

    #[test]
    fn test_body_equals_json_ignores_whitespace_and_key_order() {
        let resp = response(200, "{\"a\":1,\"b\":2}\n");
        assert!(body_equals_json(&resp, r#"{ "b": 2, "a": 1 }"#).is_ok());

        let err = body_equals_json(&resp, r#"{"a":1,"b":3}"#).unwrap_err();
        let message = err.to_string();
        // Both raw texts are listed for diagnosis.
        assert!(message.contains(r#""b":3"#));
        assert!(message.contains(r#""b":2"#));
        assert!(matches!(err, AssertError::Mismatch { .. }));
    }

    #[test]
    fn test_body_equals_json_rejects_malformed_expectation() {
        let resp = response(200, r#"{"a":1}"#);
        let err = body_equals_json(&resp, "{not json").unwrap_err();
        assert!(matches!(err, AssertError::Parse { .. }));
    }

    #[test]
    fn test_json_path_equals_string() {
        let resp = response(200, r#"{"result":"success"}"#);
        assert!(json_path_equals(&resp, "$.result", "success").is_ok());
        assert!(json_path_equals(&resp, "$.result", "failure").is_err());
    }

    #[test]
    fn test_json_path_equals_numeric_coercion() {
        let resp = response(200, r#"{"b": 2, "pi": 3.5}"#);
        assert!(json_path_equals(&resp, "$.b", "2").is_ok());
        assert!(json_path_equals(&resp, "$.pi", "3.5").is_ok());

        let err = json_path_equals(&resp, "$.b", "two").unwrap_err();
        assert!(matches!(
            err,
            AssertError::Coercion { kind: "number", .. }
        ));
    }

    #[test]
    fn test_json_path_equals_boolean_coercion() {
        let resp = response(200, r#"{"d": true}"#);
        assert!(json_path_equals(&resp, "$.d", "true").is_ok());
        assert!(json_path_equals(&resp, "$.d", "false").is_err());

        let err = json_path_equals(&resp, "$.d", "yes").unwrap_err();
        assert!(matches!(
            err,
            AssertError::Coercion {
                kind: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn test_json_path_equals_unresolved_path() {
        let resp = response(200, r#"{"a": 1}"#);
        let err = json_path_equals(&resp, "$.missing", "1").unwrap_err();
        assert!(matches!(err, AssertError::Path(PathError::NotFound { .. })));
    }

    #[test]
    fn test_json_path_matches() {
        let resp = response(200, r#"{"id": "user-42", "n": 7}"#);
        assert!(json_path_matches(&resp, "$.id", r"^user-\d+$").is_ok());

        let err = json_path_matches(&resp, "$.id", r"^order-").unwrap_err();
        assert!(matches!(err, AssertError::Mismatch { .. }));

        let err = json_path_matches(&resp, "$.n", r"\d").unwrap_err();
        assert!(matches!(
            err,
            AssertError::Path(PathError::UnexpectedType {
                expected: "string",
                ..
            })
        ));

        let err = json_path_matches(&resp, "$.id", "(unclosed").unwrap_err();
        assert!(matches!(err, AssertError::InvalidPattern { .. }));
    }

    #[test]
    fn test_json_path_is_present_null_versus_absent() {
        let resp = response(200, r#"{"present": null}"#);
        assert!(json_path_is_present(&resp, "$.present").is_ok());

        let err = json_path_is_present(&resp, "$.absent").unwrap_err();
        assert!(matches!(err, AssertError::Path(PathError::NotFound { .. })));
    }

    #[test]
    fn test_json_path_has_count() {
        let resp = response(200, r#"{"list": ["a", "b"], "name": "x"}"#);
        assert!(json_path_has_count(&resp, "$.list", 2).is_ok());

        let err = json_path_has_count(&resp, "$.list", 3).unwrap_err();
        let message = err.to_string();
        assert!(message.contains('3') && message.contains('2'));

        let err = json_path_has_count(&resp, "$.name", 1).unwrap_err();
        assert!(matches!(
            err,
            AssertError::Path(PathError::UnexpectedType {
                expected: "array",
                ..
            })
        ));
    }

    #[test]
    fn test_json_path_has_count_on_root_array() {
        let resp = response(200, r#"[1, 2, 3]"#);
        assert!(json_path_has_count(&resp, "$", 3).is_ok());
        assert!(json_path_has_count(&resp, "$", 2).is_err());
    }

    #[test]
    fn test_body_contains_trims_trailing_newline() {
        let resp = response(200, "hello world\n");
        assert!(body_contains(&resp, "world").is_ok());
        assert!(body_contains(&resp, "world\n").is_err());
        assert!(body_contains(&resp, "absent").is_err());
    }

    #[test]
    fn test_body_matches_pattern() {
        let resp = response(200, "ID: 12345\n");
        assert!(body_matches_pattern(&resp, r"ID: \d+").is_ok());
        assert!(body_matches_pattern(&resp, r"ID: [a-z]+").is_err());
        assert!(matches!(
            body_matches_pattern(&resp, "(unclosed").unwrap_err(),
            AssertError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_header_equals() {
        let resp = response_with_header("X-Some-Header", "hello");
        assert!(header_equals(&resp, "x-some-header", "hello").is_ok());

        let err = header_equals(&resp, "X-Some-Header", "goodbye").unwrap_err();
        assert!(err.to_string().contains("hello"));

        // An absent header surfaces as an empty-string actual value.
        let err = header_equals(&resp, "X-Never-Set", "hello").unwrap_err();
        assert!(matches!(
            err,
            AssertError::Mismatch { ref actual, .. } if actual.is_empty()
        ));
    }

    const PERSON_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "firstName": {"type": "string"},
            "lastName": {"type": "string"},
            "age": {"type": "integer"}
        },
        "required": ["firstName", "lastName", "age"]
    }"#;

    const COORDINATES_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "latitude": {"type": "number"},
            "longitude": {"type": "number"}
        },
        "required": ["latitude", "longitude"]
    }"#;

    fn schemas_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in [
            ("person.json", PERSON_SCHEMA),
            ("coordinates.json", COORDINATES_SCHEMA),
        ] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn test_schema_match_and_mismatch() {
        let dir = schemas_dir();
        let resp = response(
            200,
            r#"{"firstName":"Bruno","lastName":"Paz","age":30}"#,
        );

        assert!(matches_json_schema(&resp, dir.path(), "person.json").is_ok());
        // Leading/trailing slashes are trimmed before joining.
        assert!(matches_json_schema(&resp, dir.path(), "/person.json/").is_ok());

        let err = matches_json_schema(&resp, dir.path(), "coordinates.json").unwrap_err();
        match err {
            AssertError::SchemaViolations { schema, violations } => {
                assert_eq!(schema, "coordinates.json");
                assert_eq!(violations.len(), 2, "both missing fields reported");
            }
            other => panic!("expected SchemaViolations, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_file_errors_are_distinct() {
        let dir = schemas_dir();
        let resp = response(200, "{}");

        let err = matches_json_schema(&resp, dir.path(), "nope.json").unwrap_err();
        assert!(matches!(err, AssertError::SchemaNotFound { .. }));

        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let err = matches_json_schema(&resp, dir.path(), "broken.json").unwrap_err();
        assert!(matches!(err, AssertError::SchemaUnreadable { .. }));
    }
}
