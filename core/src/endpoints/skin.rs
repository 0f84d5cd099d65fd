//! Skin management. All three operations answer `204 No Content` on
//! success and opt into it explicitly.

use std::path::PathBuf;

use secrecy::SecretString;
use uuid::Uuid;

use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{DeleteRequest, FileUpload, FormPost, RequestDescriptor};
use crate::response::Response;

fn skin_path(id: Uuid) -> String {
    format!("/user/profile/{}/skin", id.simple())
}

/// Point the profile's skin at a hosted image.
#[derive(Debug, Clone)]
pub struct ChangeSkin {
    pub access_token: SecretString,
    pub id: Uuid,
    pub skin_url: String,
    pub slim: bool,
}

impl ChangeSkin {
    pub fn new(access_token: impl Into<SecretString>, id: Uuid, skin_url: impl Into<String>, slim: bool) -> Self {
        Self {
            access_token: access_token.into(),
            id,
            skin_url: skin_url.into(),
            slim,
        }
    }
}

impl Endpoint for ChangeSkin {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let fields = vec![
            ("model".to_string(), if self.slim { "slim" } else { "" }.to_string()),
            ("url".to_string(), self.skin_url.clone()),
        ];
        let url = ctx.hosts.api_url(&skin_path(self.id))?;
        Ok(FormPost::new(url, self.access_token.clone(), fields).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        response.accept_no_content()
    }
}

/// Upload a skin image from disk.
#[derive(Debug, Clone)]
pub struct UploadSkin {
    pub access_token: SecretString,
    pub id: Uuid,
    pub file: PathBuf,
    pub slim: bool,
}

impl UploadSkin {
    pub fn new(access_token: impl Into<SecretString>, id: Uuid, file: impl Into<PathBuf>, slim: bool) -> Self {
        Self {
            access_token: access_token.into(),
            id,
            file: file.into(),
            slim,
        }
    }
}

impl Endpoint for UploadSkin {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let url = ctx.hosts.api_url(&skin_path(self.id))?;
        Ok(FileUpload::new(url, self.access_token.clone(), self.file.clone(), self.slim).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        response.accept_no_content()
    }
}

/// Restore the default skin.
#[derive(Debug, Clone)]
pub struct ResetSkin {
    pub access_token: SecretString,
    pub id: Uuid,
}

impl ResetSkin {
    pub fn new(access_token: impl Into<SecretString>, id: Uuid) -> Self {
        Self {
            access_token: access_token.into(),
            id,
        }
    }
}

impl Endpoint for ResetSkin {
    type Output = Response;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let url = ctx.hosts.api_url(&skin_path(self.id))?;
        Ok(DeleteRequest::new(url, self.access_token.clone()).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        response.accept_no_content()
    }
}
