//! Authentication server endpoints.
//!
//! These are unauthenticated JSON posts, so the core never looks for a
//! structured error body on them. `Authenticate` recovers it itself since
//! credential failures always carry one.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use super::{decoded, with_structured_error};
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{JsonPost, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::{Credentials, Session};

/// Log in with account credentials.
#[derive(Debug, Clone)]
pub struct Authenticate {
    pub credentials: Credentials,
}

impl Authenticate {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl Endpoint for Authenticate {
    type Output = TypedResponse<Session>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let body = json!({
            "agent": { "name": "Minecraft", "version": 1 },
            "username": self.credentials.username,
            "password": self.credentials.password.expose_secret(),
            "clientToken": ctx.client_token.to_string(),
            "requestUser": true,
        });
        Ok(JsonPost::new(ctx.hosts.auth_url("/authenticate")?, body.to_string()).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        decoded(with_structured_error(response), |r| r.json())
    }
}

/// Exchange a valid access token for a fresh one.
#[derive(Debug, Clone)]
pub struct Refresh {
    pub access_token: SecretString,
}

impl Refresh {
    pub fn new(access_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Refreshed {
    access_token: String,
}

impl Endpoint for Refresh {
    /// The new access token.
    type Output = TypedResponse<String>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        token_post(ctx, "/refresh", &self.access_token)
    }

    fn parse(self, response: Response) -> Self::Output {
        decoded(response, |r| r.json::<Refreshed>().map(|t| t.access_token))
    }
}

/// Check that an access token is still usable. Success is `204 No Content`.
#[derive(Debug, Clone)]
pub struct Validate {
    pub access_token: SecretString,
}

impl Validate {
    pub fn new(access_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl Endpoint for Validate {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        token_post(ctx, "/validate", &self.access_token)
    }

    fn parse(self, response: Response) -> Self::Output {
        response.accept_no_content()
    }
}

/// Revoke an access token. Success is `204 No Content`.
#[derive(Debug, Clone)]
pub struct Invalidate {
    pub access_token: SecretString,
}

impl Invalidate {
    pub fn new(access_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl Endpoint for Invalidate {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        token_post(ctx, "/invalidate", &self.access_token)
    }

    fn parse(self, response: Response) -> Self::Output {
        response.accept_no_content()
    }
}

/// Revoke every token of an account. Success is an empty answer.
#[derive(Debug, Clone)]
pub struct Signout {
    pub credentials: Credentials,
}

impl Signout {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl Endpoint for Signout {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let body = json!({
            "username": self.credentials.username,
            "password": self.credentials.password.expose_secret(),
        });
        Ok(JsonPost::new(ctx.hosts.auth_url("/signout")?, body.to_string()).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        let response = response.accept_no_content();
        if response.is_success() && !response.raw_body().trim().is_empty() {
            let error = response.error_or_status();
            return response.with_error(error);
        }
        response
    }
}

fn token_post(
    ctx: &EndpointContext<'_>,
    path: &str,
    access_token: &SecretString,
) -> Result<RequestDescriptor, PreconditionError> {
    let body = json!({
        "accessToken": access_token.expose_secret(),
        "clientToken": ctx.client_token.to_string(),
    });
    Ok(JsonPost::new(ctx.hosts.auth_url(path)?, body.to_string()).into())
}
