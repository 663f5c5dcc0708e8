// api-tests/src/client/response.rs
// ============================================================================
// Module: API Responses
// Description: Captured HTTP responses and chainable assertions on them.
// Purpose: Turn status and body mismatches into descriptive test failures.
// Dependencies: regex, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ApiResponse`] holds the status and full body of one exchange. Every
//! assertion returns `Result<&Self, AssertionError>` so checks chain with
//! `?` and a failing check names the request, the JSON pointer and the
//! offending value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest body excerpt quoted in an assertion message.
const BODY_PREVIEW_CHARS: usize = 512;

/// Pointer to the array returned by list endpoints.
pub const ITEMS_POINTER: &str = "/items";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A response did not match an expectation.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// Unexpected status code.
    #[error("{request}: expected status {expected}, got {actual}; body: {body}")]
    Status {
        /// `METHOD url` of the exchange.
        request: String,
        /// Expected status.
        expected: u16,
        /// Received status.
        actual: u16,
        /// Body excerpt.
        body: String,
    },
    /// Body is not JSON.
    #[error("{request}: body is not json ({message}); body: {body}")]
    NotJson {
        /// `METHOD url` of the exchange.
        request: String,
        /// Parser message.
        message: String,
        /// Body excerpt.
        body: String,
    },
    /// No value at a JSON pointer.
    #[error("{request}: no value at {pointer}")]
    MissingField {
        /// `METHOD url` of the exchange.
        request: String,
        /// JSON pointer.
        pointer: String,
    },
    /// Value at a JSON pointer differs from the expected one.
    #[error("{request}: {pointer} expected {expected}, got {actual}")]
    FieldMismatch {
        /// `METHOD url` of the exchange.
        request: String,
        /// JSON pointer.
        pointer: String,
        /// Expected value.
        expected: Value,
        /// Received value.
        actual: Value,
    },
    /// Value at a JSON pointer has the wrong JSON type.
    #[error("{request}: {pointer} expected {expected}, got {actual}")]
    WrongType {
        /// `METHOD url` of the exchange.
        request: String,
        /// JSON pointer.
        pointer: String,
        /// Expected JSON type.
        expected: &'static str,
        /// Received value.
        actual: Value,
    },
    /// String at a JSON pointer does not match a pattern.
    #[error("{request}: {pointer} value `{actual}` does not match /{pattern}/")]
    PatternMismatch {
        /// `METHOD url` of the exchange.
        request: String,
        /// JSON pointer.
        pointer: String,
        /// Regular expression.
        pattern: String,
        /// Received string.
        actual: String,
    },
    /// The pattern itself does not compile.
    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern {
        /// Regular expression.
        pattern: String,
        /// Compiler message.
        message: String,
    },
    /// Body lacks an expected substring.
    #[error("{request}: body does not contain `{needle}`; body: {body}")]
    BodyMismatch {
        /// `METHOD url` of the exchange.
        request: String,
        /// Expected substring.
        needle: String,
        /// Body excerpt.
        body: String,
    },
    /// Array at a JSON pointer has the wrong length.
    #[error("{request}: {pointer} expected {expected} element(s), got {actual}")]
    ArrayLength {
        /// `METHOD url` of the exchange.
        request: String,
        /// JSON pointer.
        pointer: String,
        /// Expected length.
        expected: usize,
        /// Received length.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// One captured HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Request method.
    method: String,
    /// Absolute request URL.
    url: String,
    /// Status code.
    status: u16,
    /// Raw response body.
    body: String,
    /// Parsed body, when it is JSON.
    json: Result<Value, String>,
}

impl ApiResponse {
    /// Captures a response.
    #[must_use]
    pub fn new(method: &str, url: &str, status: u16, body: String) -> Self {
        let json = serde_json::from_str(&body).map_err(|err| err.to_string());
        Self {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body,
            json,
        }
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the absolute request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the parsed body as a JSON value for transcripts.
    ///
    /// Non-JSON bodies become a JSON string; empty bodies become `null`.
    #[must_use]
    pub fn body_value(&self) -> Value {
        match &self.json {
            Ok(value) => value.clone(),
            Err(_) if self.body.is_empty() => Value::Null,
            Err(_) => Value::String(self.body.clone()),
        }
    }

    /// Returns `METHOD url` for error messages.
    fn request_line(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Asserts the status code.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Status`] on mismatch.
    pub fn expect_status(&self, expected: u16) -> Result<&Self, AssertionError> {
        if self.status == expected {
            return Ok(self);
        }
        Err(AssertionError::Status {
            request: self.request_line(),
            expected,
            actual: self.status,
            body: preview(&self.body),
        })
    }

    /// Returns the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NotJson`] when the body does not parse.
    pub fn json(&self) -> Result<&Value, AssertionError> {
        self.json.as_ref().map_err(|message| AssertionError::NotJson {
            request: self.request_line(),
            message: message.clone(),
            body: preview(&self.body),
        })
    }

    /// Returns the value at a JSON pointer such as `/links/self/href`.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not JSON or the pointer is absent.
    pub fn field(&self, pointer: &str) -> Result<&Value, AssertionError> {
        self.json()?.pointer(pointer).ok_or_else(|| AssertionError::MissingField {
            request: self.request_line(),
            pointer: pointer.to_string(),
        })
    }

    /// Returns the string at a JSON pointer.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is absent or not a string.
    pub fn str_field(&self, pointer: &str) -> Result<&str, AssertionError> {
        let value = self.field(pointer)?;
        value.as_str().ok_or_else(|| AssertionError::WrongType {
            request: self.request_line(),
            pointer: pointer.to_string(),
            expected: "string",
            actual: value.clone(),
        })
    }

    /// Asserts that the value at a JSON pointer equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is absent or differs.
    pub fn expect_field(
        &self,
        pointer: &str,
        expected: impl Into<Value>,
    ) -> Result<&Self, AssertionError> {
        let expected = expected.into();
        let actual = self.field(pointer)?;
        if *actual == expected {
            return Ok(self);
        }
        Err(AssertionError::FieldMismatch {
            request: self.request_line(),
            pointer: pointer.to_string(),
            expected,
            actual: actual.clone(),
        })
    }

    /// Asserts that the string at a JSON pointer equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is absent, not a string, or differs.
    pub fn expect_str(&self, pointer: &str, expected: &str) -> Result<&Self, AssertionError> {
        let actual = self.str_field(pointer)?;
        if actual == expected {
            return Ok(self);
        }
        Err(AssertionError::FieldMismatch {
            request: self.request_line(),
            pointer: pointer.to_string(),
            expected: Value::String(expected.to_string()),
            actual: Value::String(actual.to_string()),
        })
    }

    /// Asserts that the string at a JSON pointer matches a regular expression.
    ///
    /// # Errors
    ///
    /// Returns an error when the pattern is invalid, the value is absent or
    /// not a string, or it does not match.
    pub fn expect_matches(&self, pointer: &str, pattern: &str) -> Result<&Self, AssertionError> {
        let regex = Regex::new(pattern).map_err(|err| AssertionError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        let actual = self.str_field(pointer)?;
        if regex.is_match(actual) {
            return Ok(self);
        }
        Err(AssertionError::PatternMismatch {
            request: self.request_line(),
            pointer: pointer.to_string(),
            pattern: pattern.to_string(),
            actual: actual.to_string(),
        })
    }

    /// Asserts that the raw body contains a literal substring.
    ///
    /// Error responses from the services are plain text, so this is how
    /// their messages are checked.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::BodyMismatch`] when the substring is absent.
    pub fn expect_body_contains(&self, needle: &str) -> Result<&Self, AssertionError> {
        if self.body.contains(needle) {
            return Ok(self);
        }
        Err(AssertionError::BodyMismatch {
            request: self.request_line(),
            needle: needle.to_string(),
            body: preview(&self.body),
        })
    }

    /// Returns the array at a JSON pointer.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is absent or not an array.
    pub fn array(&self, pointer: &str) -> Result<&Vec<Value>, AssertionError> {
        let value = self.field(pointer)?;
        value.as_array().ok_or_else(|| AssertionError::WrongType {
            request: self.request_line(),
            pointer: pointer.to_string(),
            expected: "array",
            actual: value.clone(),
        })
    }

    /// Asserts the length of the array at a JSON pointer.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is absent, not an array, or has a
    /// different length.
    pub fn expect_array_len(
        &self,
        pointer: &str,
        expected: usize,
    ) -> Result<&Self, AssertionError> {
        let actual = self.array(pointer)?.len();
        if actual == expected {
            return Ok(self);
        }
        Err(AssertionError::ArrayLength {
            request: self.request_line(),
            pointer: pointer.to_string(),
            expected,
            actual,
        })
    }

    /// Returns the `items` array of a list response.
    ///
    /// # Errors
    ///
    /// Returns an error when `/items` is absent or not an array.
    pub fn items(&self) -> Result<&Vec<Value>, AssertionError> {
        self.array(ITEMS_POINTER)
    }

    /// Returns the first list item whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MissingField`] when no item matches.
    pub fn item_where(&self, field: &str, value: &str) -> Result<&Value, AssertionError> {
        self.items()?
            .iter()
            .find(|item| item.get(field).and_then(Value::as_str) == Some(value))
            .ok_or_else(|| AssertionError::MissingField {
                request: self.request_line(),
                pointer: format!("{ITEMS_POINTER}[{field}={value}]"),
            })
    }
}

/// Truncates a body for inclusion in an error message.
fn preview(body: &str) -> String {
    if body.chars().count() <= BODY_PREVIEW_CHARS {
        return body.to_string();
    }
    let mut excerpt: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
