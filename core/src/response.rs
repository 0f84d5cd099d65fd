//! Outcome values returned by the requester.
//!
//! # Design
//! `Response` is created once per call by the requester and is immutable
//! afterwards: fields are private and the only "mutators" consume the value
//! and return a new one. Status and raw body always survive such
//! adjustments, so an endpoint can reinterpret an outcome but never rewrite
//! what the server actually sent.
//!
//! Typed endpoint results compose a base `Response` with a payload
//! (`TypedResponse<T>`) instead of copying its fields into a new type.

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{ErrorKind, ResponseError};
use crate::http::HttpMethod;

/// Classified outcome of one HTTP call.
#[derive(Debug, Clone)]
pub struct Response {
    method: HttpMethod,
    status: Option<StatusCode>,
    raw_body: String,
    raw_content: Bytes,
    is_success: bool,
    error: Option<ResponseError>,
}

impl Response {
    /// Successful outcome.
    pub(crate) fn success(method: HttpMethod, status: StatusCode, raw_body: String) -> Self {
        Self {
            method,
            status: Some(status),
            raw_content: Bytes::from(raw_body.clone().into_bytes()),
            raw_body,
            is_success: true,
            error: None,
        }
    }

    /// Failed outcome. `status` is `None` when no HTTP response arrived.
    pub(crate) fn failure(
        method: HttpMethod,
        status: Option<StatusCode>,
        raw_body: String,
        error: ResponseError,
    ) -> Self {
        Self {
            method,
            status,
            raw_content: Bytes::from(raw_body.clone().into_bytes()),
            raw_body,
            is_success: false,
            error: Some(error),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Body bytes exactly as received, for binary payloads such as skin
    /// images.
    pub fn raw_content(&self) -> &[u8] {
        &self.raw_content
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn error(&self) -> Option<&ResponseError> {
        self.error.as_ref()
    }

    /// Attach the undecoded body read off the wire.
    pub(crate) fn with_raw_content(self, raw_content: Bytes) -> Self {
        Self { raw_content, ..self }
    }

    /// Decode the raw body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.raw_body)
    }

    /// Treat `204 No Content` as a success.
    ///
    /// Only GET accepts 204 in the core classification; endpoints whose
    /// remote operation answers 204 on success opt in through this.
    pub fn accept_no_content(self) -> Self {
        if self.status == Some(StatusCode::NO_CONTENT) {
            Self {
                is_success: true,
                error: None,
                ..self
            }
        } else {
            self
        }
    }

    /// Replace the outcome with a failure carrying `error`.
    pub fn with_error(self, error: ResponseError) -> Self {
        Self {
            is_success: false,
            error: Some(error),
            ..self
        }
    }

    /// Error of a failed response, or a protocol error derived from the
    /// status when the response was rejected by an endpoint after a
    /// successful classification.
    pub(crate) fn error_or_status(&self) -> ResponseError {
        if let Some(err) = &self.error {
            return err.clone();
        }
        match self.status {
            Some(status) => ResponseError::from_status(status),
            None => ResponseError::new(ErrorKind::Transport, "NoResponse", "no response received"),
        }
    }
}

/// A `Response` plus the domain payload an endpoint extracted from it.
#[derive(Debug, Clone)]
pub struct TypedResponse<T> {
    base: Response,
    payload: Option<T>,
}

impl<T> TypedResponse<T> {
    /// Successful outcome carrying `payload`.
    pub fn with_payload(base: Response, payload: T) -> Self {
        Self {
            base,
            payload: Some(payload),
        }
    }

    /// Outcome without payload (failed, or successful with nothing to report).
    pub fn empty(base: Response) -> Self {
        Self { base, payload: None }
    }

    pub fn response(&self) -> &Response {
        &self.base
    }

    pub fn is_success(&self) -> bool {
        self.base.is_success()
    }

    pub fn error(&self) -> Option<&ResponseError> {
        self.base.error()
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    pub fn into_parts(self) -> (Response, Option<T>) {
        (self.base, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_content_post() -> Response {
        Response::failure(
            HttpMethod::Post,
            Some(StatusCode::NO_CONTENT),
            String::new(),
            ResponseError::disallowed(StatusCode::NO_CONTENT),
        )
    }

    #[test]
    fn accept_no_content_flips_only_204() {
        let accepted = no_content_post().accept_no_content();
        assert!(accepted.is_success());
        assert!(accepted.error().is_none());
        assert_eq!(accepted.status(), Some(StatusCode::NO_CONTENT));

        let server_error = Response::failure(
            HttpMethod::Delete,
            Some(StatusCode::INTERNAL_SERVER_ERROR),
            "boom".to_string(),
            ResponseError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .accept_no_content();
        assert!(!server_error.is_success());
        assert_eq!(server_error.error().unwrap().tag(), "InternalServerError");
    }

    #[test]
    fn with_error_keeps_status_and_body() {
        let ok = Response::success(HttpMethod::Get, StatusCode::OK, "{}".to_string());
        let failed = ok.with_error(ResponseError::new(ErrorKind::Api, "Tag", "msg"));
        assert!(!failed.is_success());
        assert_eq!(failed.status(), Some(StatusCode::OK));
        assert_eq!(failed.raw_body(), "{}");
        assert_eq!(failed.error().unwrap().tag(), "Tag");
    }

    #[test]
    fn raw_content_survives_lossy_text() {
        let png = Bytes::from_static(b"\x89PNG\r\n\x1a\n");
        let text = String::from_utf8_lossy(&png).into_owned();
        let response = Response::success(HttpMethod::Get, StatusCode::OK, text).with_raw_content(png.clone());
        assert_eq!(response.raw_content(), &png[..]);
        assert_ne!(response.raw_body().as_bytes(), &png[..]);

        let failed = response.with_error(ResponseError::new(ErrorKind::Api, "Tag", "msg"));
        assert_eq!(failed.raw_content(), &png[..]);
    }

    #[test]
    fn error_or_status_prefers_recorded_error() {
        let failed = no_content_post();
        assert_eq!(failed.error_or_status().tag(), "NoContent");

        let ok = Response::success(HttpMethod::Post, StatusCode::OK, String::new());
        assert_eq!(ok.error_or_status().tag(), "OK");
    }

    #[test]
    fn typed_response_exposes_base_and_payload() {
        let base = Response::success(HttpMethod::Get, StatusCode::OK, "[1,2]".to_string());
        let numbers: Vec<u32> = base.json().unwrap();
        let typed = TypedResponse::with_payload(base, numbers);
        assert!(typed.is_success());
        assert_eq!(typed.payload(), Some(&vec![1, 2]));
        assert_eq!(typed.response().raw_body(), "[1,2]");
    }
}
