//! Bad-request failures and the error-list formatter.
//!
//! Identity operations and field validation both report failures as lists of
//! human-readable messages. [`format_error_lines`] flattens such a list into
//! a single string, one `- <message>` line per entry, and [`BadRequest`]
//! carries that string to the HTTP boundary with a fixed 400 classification.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// An error reported by the identity provider (e.g. duplicate email).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityError {
    /// Machine-readable code, e.g. `DuplicateEmail`.
    pub code: String,
    /// Human-readable description shown to the client.
    pub description: String,
}

impl IdentityError {
    /// Create a new identity error.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// A single field-validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Name of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationFailure {
    /// Create a new validation failure.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Format messages as `- <message>` lines, each terminated by `\n`.
///
/// Input order is preserved; nothing is deduplicated or dropped.
pub fn format_error_lines<I, S>(messages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    messages.into_iter().fold(String::new(), |mut out, message| {
        out.push_str("- ");
        out.push_str(message.as_ref());
        out.push('\n');
        out
    })
}

/// A client-facing failure whose payload is a formatted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadRequest {
    message: String,
}

impl BadRequest {
    /// Wrap a single literal message, unformatted.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Format an arbitrary list of messages.
    pub fn from_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(format_error_lines(messages))
    }

    /// Format the descriptions of identity-provider errors.
    pub fn from_identity_errors(errors: &[IdentityError]) -> Self {
        Self::from_messages(errors.iter().map(|e| e.description.as_str()))
    }

    /// Format the messages of field-validation failures.
    pub fn from_validation_failures(failures: &[ValidationFailure]) -> Self {
        Self::from_messages(failures.iter().map(|f| f.message.as_str()))
    }

    /// The formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Transport classification; always `400 Bad Request`.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl fmt::Display for BadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BadRequest {}
