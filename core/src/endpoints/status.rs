//! Service status from the status API.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::decoded;
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{GetRequest, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::{ApiStatus, ServiceStatus};

/// Health of the Mojang services.
#[derive(Debug, Clone, Default)]
pub struct StatusCheck;

impl Endpoint for StatusCheck {
    type Output = TypedResponse<ApiStatus>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        Ok(GetRequest::new(ctx.hosts.status_url("/check")?).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        decoded(response, |r| {
            // The service answers a list of single-entry objects.
            let entries: Vec<Map<String, Value>> = r.json()?;
            let statuses: HashMap<String, ServiceStatus> = entries
                .into_iter()
                .flatten()
                .map(|(service, value)| {
                    let status = value.as_str().map(ServiceStatus::parse).unwrap_or_default();
                    (service, status)
                })
                .collect();
            let of = |service: &str| statuses.get(service).copied().unwrap_or_default();
            Ok(ApiStatus {
                minecraft: of("minecraft.net"),
                sessions: of("session.minecraft.net"),
                accounts: of("account.mojang.com"),
                auth_server: of("authserver.mojang.com"),
                session_server: of("sessionserver.mojang.com"),
                api: of("api.mojang.com"),
                textures: of("textures.minecraft.net"),
                mojang: of("mojang.com"),
            })
        })
    }
}
