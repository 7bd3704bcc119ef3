//! Error contract shared between the HTTP client and the auth operations.
//!
//! The server reports business-rule rejections as `{code, message}` bodies.
//! Branching is done on the machine-readable `code` tag; the human `message`
//! is only ever displayed, never parsed.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable rejection codes returned by the API. Codes this client
/// does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCredentials,
    UnverifiedEmail,
    UnverifiedPhone,
    InvalidToken,
    ExpiredToken,
    IncorrectCode,
    RateLimited,
    EmailTaken,
    #[serde(untagged)]
    Other(String),
}

/// One client-side validation failure, attached to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All validation failures for a submission, collected rather than
/// first-only. A draft with any failure never reaches the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Turn the collected failures into a result, for use at the end of a
    /// `validate()` pass.
    ///
    /// # Errors
    /// Returns `self` if any failure was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors surfaced by the client and the auth operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The server rejected our credentials. The store has already been
    /// cleared and the unauthenticated signal raised by the time callers
    /// see this.
    #[error("authentication rejected; sign in again")]
    Unauthenticated,

    /// A 4xx/5xx other than 401, with the server's structured body.
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: Option<ErrorCode>,
        message: String,
    },

    /// The request never got a response: connect failure or timeout.
    #[error("no response from server: {0}")]
    NoConnection(String),

    /// Got a response, but not the JSON we expected.
    #[error("unexpected response from server: {0}")]
    UnexpectedResponse(String),

    /// `refresh` was invoked with no refresh token on disk. Local
    /// precondition failure; no request is made.
    #[error("no refresh token stored; sign in first")]
    MissingRefreshToken,

    /// Client-side validation rejected the submission before any request.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The credential store could not be read or written.
    #[error("credential store: {0}")]
    Store(String),
}

impl Error {
    /// The structured code, when the server provided one.
    #[must_use]
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api { code, .. } => code.as_ref(),
            _ => None,
        }
    }
}
