//! Error types for the Mojang API client.
//!
//! # Design
//! Two families with different propagation rules:
//!
//! - `PreconditionError` is a caller mistake (missing token, absent body,
//!   missing file). It is returned as `Err` before any network activity and
//!   is never wrapped in a `Response`.
//! - `ResponseError` describes a network outcome. It always travels inside a
//!   `Response` whose `is_success()` is false, never as an `Err`.
//!
//! `TransportError` is the underlying failure a `ResponseError` may point to
//! through its `cause`.

use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::http::status_name;

/// Caller-side contract violations detected before dispatch.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("an authenticated call requires a non-empty bearer token")]
    MissingToken,

    #[error("bearer token contains characters not allowed in a header")]
    InvalidToken,

    #[error("request body must be set before a POST")]
    MissingBody,

    #[error("unknown charset {label:?}")]
    UnknownCharset { label: String },

    #[error("form body must contain at least one field")]
    EmptyForm,

    #[error("no file given")]
    MissingFile,

    #[error("given file does not exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid address {path:?}: {source}")]
    InvalidAddress {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("only up to {max} usernames per request are allowed, got {count}")]
    TooManyNames { count: usize, max: usize },

    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while building the shared HTTP client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Low-level failure recorded as the cause of a `ResponseError`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "Response status code does not indicate success: {} ({}).",
        .0.as_u16(),
        .0.canonical_reason().unwrap_or("Unknown")
    )]
    Status(StatusCode),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failure, timeout, unreadable or non-parseable response.
    Transport,
    /// Structured `{error, errorMessage}` body returned by the service.
    Api,
    /// Disallowed status without a structured body.
    Protocol,
}

/// Structured failure attached to every unsuccessful `Response`.
#[derive(Debug, Clone)]
pub struct ResponseError {
    kind: ErrorKind,
    tag: String,
    message: String,
    cause: Option<Arc<TransportError>>,
}

/// Error document returned by the account services on auth failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "errorMessage")]
    error_message: String,
}

impl ResponseError {
    pub fn new(kind: ErrorKind, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
            message: message.into(),
            cause: None,
        }
    }

    fn with_cause(mut self, cause: TransportError) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Generic error for a failure raised by the transport layer.
    ///
    /// The tag is the innermost source's message, the message is the
    /// top-level one.
    pub fn from_transport(err: TransportError) -> Self {
        let message = err.to_string();
        let tag = root_message(&err).unwrap_or_else(|| message.clone());
        Self::new(ErrorKind::Transport, tag, message).with_cause(err)
    }

    /// Generic error for a non-2xx status, keyed by the status name.
    pub fn from_status(status: StatusCode) -> Self {
        let cause = TransportError::Status(status);
        let message = if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            "Post contents must not be well formatted".to_string()
        } else {
            cause.to_string()
        };
        Self::new(ErrorKind::Protocol, status_name(status), message).with_cause(cause)
    }

    /// Error for a 2xx status that is not in the verb's allowed set.
    pub fn disallowed(status: StatusCode) -> Self {
        let tag = status_name(status);
        let message = if status == StatusCode::NO_CONTENT {
            "Response has no content".to_string()
        } else {
            tag.clone()
        };
        Self::new(ErrorKind::Protocol, tag, message)
    }

    /// Parse a structured `{error, errorMessage}` body. Returns `None` when
    /// the body does not have that shape.
    pub fn from_body(body: &str, status: StatusCode) -> Option<Self> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        Some(
            Self::new(ErrorKind::Api, parsed.error, parsed.error_message)
                .with_cause(TransportError::Status(status)),
        )
    }

    /// Error for a body that could not be decoded into the expected shape.
    pub fn from_decode(err: serde_json::Error) -> Self {
        Self::from_transport(TransportError::Decode(err))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&TransportError> {
        self.cause.as_deref()
    }

    /// Whether the underlying transport failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause(), Some(TransportError::Http(e)) if e.is_timeout())
    }
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tag, self.message)
    }
}

impl StdError for ResponseError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn StdError + 'static))
    }
}

/// Message of the deepest error in the `source()` chain, if any.
fn root_message(err: &(dyn StdError + 'static)) -> Option<String> {
    let mut current = err.source()?;
    while let Some(next) = current.source() {
        current = next;
    }
    let message = current.to_string();
    (!message.is_empty()).then_some(message)
}
