//! The seam between the request pipeline and individual endpoints.

use uuid::Uuid;

use crate::config::Hosts;
use crate::error::PreconditionError;
use crate::request::RequestDescriptor;
use crate::response::Response;

/// What an endpoint may read from the requester while building its request.
#[derive(Debug, Clone, Copy)]
pub struct EndpointContext<'a> {
    pub hosts: &'a Hosts,
    pub client_token: Uuid,
}

/// One remote operation: how to describe the call and how to read its
/// outcome.
///
/// Run through `Requester::perform`, which builds the descriptor, executes
/// it once and passes the classified `Response` to `parse`.
pub trait Endpoint {
    type Output;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError>;

    fn parse(self, response: Response) -> Self::Output;
}
