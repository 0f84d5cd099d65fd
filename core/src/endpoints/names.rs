//! Name to id resolution on the profiles API.

use reqwest::StatusCode;

use super::decoded;
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::{ErrorKind, PreconditionError, ResponseError};
use crate::request::{JsonPost, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::PlayerId;

/// Upper bound the profiles API accepts in one call.
pub const MAX_NAMES_PER_REQUEST: usize = 100;

/// Resolve player names to ids. Unknown names are absent from the result.
#[derive(Debug, Clone)]
pub struct UuidsByNames {
    pub names: Vec<String>,
}

impl UuidsByNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Endpoint for UuidsByNames {
    type Output = TypedResponse<Vec<PlayerId>>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        if self.names.len() > MAX_NAMES_PER_REQUEST {
            return Err(PreconditionError::TooManyNames {
                count: self.names.len(),
                max: MAX_NAMES_PER_REQUEST,
            });
        }
        let body = serde_json::to_string(&self.names)?;
        Ok(JsonPost::new(ctx.hosts.api_url("/profiles/minecraft")?, body).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        if response.status() == Some(StatusCode::BAD_REQUEST) {
            let error = ResponseError::new(
                ErrorKind::Api,
                "IllegalArgumentException",
                "One of the usernames is empty.",
            );
            return TypedResponse::empty(response.with_error(error));
        }
        decoded(response, |r| r.json())
    }
}
