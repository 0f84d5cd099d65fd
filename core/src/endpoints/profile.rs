//! Session server profile lookup.
//!
//! A rate-limited lookup answers 429 with a structured body, which is
//! recovered here since the core only looks for one on 401/403.

use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use super::with_structured_error;
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::{ErrorKind, PreconditionError, ResponseError};
use crate::request::{GetRequest, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::{Profile, Textures};

/// Profile and textures of a player.
///
/// An unknown id is answered with `204 No Content`, which GET accepts: the
/// outcome is a success without payload.
#[derive(Debug, Clone)]
pub struct ProfileLookup {
    pub id: Uuid,
    /// Ask for the property signatures as well.
    pub signed: bool,
}

impl ProfileLookup {
    pub fn new(id: Uuid) -> Self {
        Self { id, signed: false }
    }

    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }
}

#[derive(Deserialize)]
struct RawProfile {
    id: Uuid,
    name: String,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    value: String,
}

impl Endpoint for ProfileLookup {
    type Output = TypedResponse<Profile>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let mut path = format!("/session/minecraft/profile/{}", self.id.simple());
        if self.signed {
            path.push_str("?unsigned=false");
        }
        Ok(GetRequest::new(ctx.hosts.session_url(&path)?).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        if !response.is_success() {
            // Rate limiting comes with a structured body.
            if response.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
                return TypedResponse::empty(with_structured_error(response));
            }
            return TypedResponse::empty(response);
        }
        if response.raw_body().trim().is_empty() {
            return TypedResponse::empty(response);
        }

        let raw: RawProfile = match response.json() {
            Ok(raw) => raw,
            Err(err) => return TypedResponse::empty(response.with_error(ResponseError::from_decode(err))),
        };
        let textures = match raw.properties.iter().find(|p| p.name == "textures") {
            Some(property) => match Textures::decode(&property.value) {
                Ok(textures) => Some(textures),
                Err(err) => {
                    let error = ResponseError::new(ErrorKind::Transport, "InvalidTextures", err.to_string());
                    return TypedResponse::empty(response.with_error(error));
                }
            },
            None => None,
        };
        let profile = Profile {
            id: raw.id,
            name: raw.name,
            textures,
        };
        TypedResponse::with_payload(response, profile)
    }
}
