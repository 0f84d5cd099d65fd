//! Endpoints of the Mojang account services.
//!
//! Each endpoint turns its inputs into a `RequestDescriptor` and reads the
//! classified `Response` back into a domain value. Endpoints whose remote
//! operation answers `204 No Content` on success override the core
//! classification with `Response::accept_no_content`.

mod auth;
mod history;
mod names;
mod profile;
mod security;
mod skin;
mod statistics;
mod status;
mod texture;

pub use auth::{Authenticate, Invalidate, Refresh, Signout, Validate};
pub use history::{NameHistory, UuidAtTime};
pub use names::{UuidsByNames, MAX_NAMES_PER_REQUEST};
pub use profile::ProfileLookup;
pub use security::{Challenges, SecureIp};
pub use skin::{ChangeSkin, ResetSkin, UploadSkin};
pub use statistics::{StatisticItem, Statistics};
pub use status::StatusCheck;
pub use texture::Texture;

use crate::error::ResponseError;
use crate::response::{Response, TypedResponse};

/// Run `parse` on a successful response; a parse failure turns the outcome
/// into a failure carrying the decode error.
fn decoded<T>(
    response: Response,
    parse: impl FnOnce(&Response) -> Result<T, serde_json::Error>,
) -> TypedResponse<T> {
    if !response.is_success() {
        return TypedResponse::empty(response);
    }
    match parse(&response) {
        Ok(payload) => TypedResponse::with_payload(response, payload),
        Err(err) => TypedResponse::empty(response.with_error(ResponseError::from_decode(err))),
    }
}

/// Replace a failure's error with the structured body, when there is one.
fn with_structured_error(response: Response) -> Response {
    if response.is_success() {
        return response;
    }
    match response
        .status()
        .and_then(|status| ResponseError::from_body(response.raw_body(), status))
    {
        Some(err) => response.with_error(err),
        None => response,
    }
}
