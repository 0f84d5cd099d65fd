//! HTTP vocabulary shared by the requester and the endpoint layer.
//!
//! # Design
//! `HttpMethod` carries the per-verb success rule: a status only counts as a
//! success when it is 2xx *and* belongs to the verb's allowed set. GET is the
//! only verb that accepts `204 No Content`; every other verb reports it as a
//! failure and leaves the override to the endpoint that expects it.
//!
//! Auth headers are assembled here into a fresh `HeaderMap` for every call.
//! The shared `reqwest::Client` never carries default headers, so concurrent
//! calls with different bearer tokens cannot observe each other's token.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::error::PreconditionError;

/// Client name sent in the `User-Agent` header.
pub const CLIENT_NAME: &str = env!("CARGO_PKG_NAME");

/// Client version sent in the `User-Agent` header.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Statuses every verb accepts as a success.
const ALLOWED_FOR_ALL: [StatusCode; 6] = [
    StatusCode::ACCEPTED,
    StatusCode::CONTINUE,
    StatusCode::CREATED,
    StatusCode::FOUND,
    StatusCode::OK,
    StatusCode::PARTIAL_CONTENT,
];

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether `status` is in this verb's allowed-success set.
    pub fn allows(self, status: StatusCode) -> bool {
        if ALLOWED_FOR_ALL.contains(&status) {
            return true;
        }
        self == HttpMethod::Get && status == StatusCode::NO_CONTENT
    }

    /// Full success predicate for a status that arrived without a transport
    /// failure: 2xx and allowed for this verb.
    pub fn is_success(self, status: StatusCode) -> bool {
        status.is_success() && self.allows(status)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical PascalCase name of a status (`500` -> `InternalServerError`).
///
/// Falls back to the numeric code for statuses without a canonical reason.
pub fn status_name(status: StatusCode) -> String {
    let Some(reason) = status.canonical_reason() else {
        return status.as_u16().to_string();
    };
    if reason == "OK" {
        return reason.to_string();
    }
    reason
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Value of the `User-Agent` header.
pub fn user_agent() -> String {
    format!("{CLIENT_NAME}/{CLIENT_VERSION}")
}

/// Build the request-scoped header set for an authenticated call.
pub fn auth_headers(token: &SecretString) -> Result<HeaderMap, PreconditionError> {
    let token = token.expose_secret();
    if token.trim().is_empty() {
        return Err(PreconditionError::MissingToken);
    }
    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| PreconditionError::InvalidToken)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent()).map_err(|_| PreconditionError::InvalidToken)?,
    );
    Ok(headers)
}
