//! Location security of an account.

use secrecy::SecretString;
use serde::Deserialize;

use super::decoded;
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{GetRequest, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::Challenge;

/// Whether the current location is trusted for the account. A trusted
/// location answers `204 No Content`, which GET accepts as a success.
#[derive(Debug, Clone)]
pub struct SecureIp {
    pub access_token: SecretString,
}

impl SecureIp {
    pub fn new(access_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl Endpoint for SecureIp {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let url = ctx.hosts.api_url("/user/security/location")?;
        Ok(GetRequest::authenticated(url, self.access_token.clone()).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        response
    }
}

/// Security questions that secure a new location.
#[derive(Debug, Clone)]
pub struct Challenges {
    pub access_token: SecretString,
}

impl Challenges {
    pub fn new(access_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

#[derive(Deserialize)]
struct RawChallenge {
    answer: RawId,
    question: RawQuestion,
}

#[derive(Deserialize)]
struct RawId {
    id: u64,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: u64,
    question: String,
}

impl Endpoint for Challenges {
    type Output = TypedResponse<Vec<Challenge>>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let url = ctx.hosts.api_url("/user/security/challenges")?;
        Ok(GetRequest::authenticated(url, self.access_token.clone()).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        decoded(response, |r| {
            let raw: Vec<RawChallenge> = r.json()?;
            Ok(raw
                .into_iter()
                .map(|c| Challenge {
                    answer_id: c.answer.id,
                    question_id: c.question.id,
                    question: c.question.question,
                })
                .collect())
        })
    }
}
