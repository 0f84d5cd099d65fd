//! Texture downloads from the textures host. The image is read from
//! `Response::raw_content`.

use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{GetRequest, RequestDescriptor};
use crate::response::Response;

/// Download a skin or cape image by its texture hash.
#[derive(Debug, Clone)]
pub struct Texture {
    pub hash: String,
}

impl Texture {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

impl Endpoint for Texture {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let mut url = ctx.hosts.textures_url("/texture/")?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.hash);
        }
        Ok(GetRequest::new(url).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        response
    }
}
