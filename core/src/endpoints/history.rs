//! Name history lookups.

use uuid::Uuid;

use super::decoded;
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{GetRequest, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::{NameChange, PlayerId};

/// Every name a profile has had, oldest first.
#[derive(Debug, Clone)]
pub struct NameHistory {
    pub id: Uuid,
}

impl NameHistory {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Endpoint for NameHistory {
    type Output = TypedResponse<Vec<NameChange>>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let path = format!("/user/profiles/{}/names", self.id.simple());
        Ok(GetRequest::new(ctx.hosts.api_url(&path)?).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        if response.is_success() && response.raw_body().trim().is_empty() {
            return TypedResponse::empty(response);
        }
        decoded(response, |r| r.json())
    }
}

/// The player that owned `username` at a point in time.
///
/// A name nobody owned at that time is answered with `204 No Content`: the
/// outcome is a success without payload.
#[derive(Debug, Clone)]
pub struct UuidAtTime {
    pub username: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

impl UuidAtTime {
    pub fn new(username: impl Into<String>, timestamp: u64) -> Self {
        Self {
            username: username.into(),
            timestamp,
        }
    }
}

impl Endpoint for UuidAtTime {
    type Output = TypedResponse<PlayerId>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let mut url = ctx.hosts.api_url("/users/profiles/minecraft/")?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.username);
        }
        url.query_pairs_mut().append_pair("at", &self.timestamp.to_string());
        Ok(GetRequest::new(url).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        if response.is_success() && response.raw_body().trim().is_empty() {
            return TypedResponse::empty(response);
        }
        decoded(response, |r| r.json())
    }
}
