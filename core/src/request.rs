//! Request descriptors: one named-field record per request shape.
//!
//! # Design
//! A descriptor is plain data describing exactly one outbound call. The
//! requester takes it by value, so a descriptor cannot be executed twice;
//! retrying means building a new one. `RequestDescriptor` is the closed set
//! of shapes the requester knows how to execute and dispatch happens on its
//! variant tag.

use std::path::PathBuf;

use secrecy::SecretString;
use url::Url;

use crate::http::HttpMethod;

/// GET, authenticated when `token` is set.
#[derive(Debug)]
pub struct GetRequest {
    pub url: Url,
    pub token: Option<SecretString>,
}

impl GetRequest {
    pub fn new(url: Url) -> Self {
        Self { url, token: None }
    }

    pub fn authenticated(url: Url, token: impl Into<SecretString>) -> Self {
        Self {
            url,
            token: Some(token.into()),
        }
    }
}

/// Unauthenticated POST with a pre-serialized JSON document.
#[derive(Debug)]
pub struct JsonPost {
    pub url: Url,
    pub body: Option<String>,
}

impl JsonPost {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: Some(body.into()),
        }
    }
}

/// Authenticated POST with an `application/x-www-form-urlencoded` body.
#[derive(Debug)]
pub struct FormPost {
    pub url: Url,
    pub token: SecretString,
    pub fields: Vec<(String, String)>,
}

impl FormPost {
    pub fn new(url: Url, token: impl Into<SecretString>, fields: Vec<(String, String)>) -> Self {
        Self {
            url,
            token: token.into(),
            fields,
        }
    }
}

/// Authenticated multipart PUT uploading a file.
#[derive(Debug)]
pub struct FileUpload {
    pub url: Url,
    pub token: SecretString,
    pub file: Option<PathBuf>,
    pub slim_model: bool,
}

impl FileUpload {
    pub fn new(url: Url, token: impl Into<SecretString>, file: impl Into<PathBuf>, slim_model: bool) -> Self {
        Self {
            url,
            token: token.into(),
            file: Some(file.into()),
            slim_model,
        }
    }
}

/// Authenticated DELETE without a body.
#[derive(Debug)]
pub struct DeleteRequest {
    pub url: Url,
    pub token: SecretString,
}

impl DeleteRequest {
    pub fn new(url: Url, token: impl Into<SecretString>) -> Self {
        Self {
            url,
            token: token.into(),
        }
    }
}

/// Every request shape the requester can execute.
#[derive(Debug)]
pub enum RequestDescriptor {
    Get(GetRequest),
    PostJson(JsonPost),
    PostForm(FormPost),
    PutFile(FileUpload),
    Delete(DeleteRequest),
}

impl RequestDescriptor {
    pub fn method(&self) -> HttpMethod {
        match self {
            RequestDescriptor::Get(_) => HttpMethod::Get,
            RequestDescriptor::PostJson(_) | RequestDescriptor::PostForm(_) => HttpMethod::Post,
            RequestDescriptor::PutFile(_) => HttpMethod::Put,
            RequestDescriptor::Delete(_) => HttpMethod::Delete,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            RequestDescriptor::Get(r) => &r.url,
            RequestDescriptor::PostJson(r) => &r.url,
            RequestDescriptor::PostForm(r) => &r.url,
            RequestDescriptor::PutFile(r) => &r.url,
            RequestDescriptor::Delete(r) => &r.url,
        }
    }

    /// Whether the call carries a bearer token.
    pub fn is_authenticated(&self) -> bool {
        match self {
            RequestDescriptor::Get(r) => r.token.is_some(),
            RequestDescriptor::PostJson(_) => false,
            RequestDescriptor::PostForm(_) | RequestDescriptor::PutFile(_) | RequestDescriptor::Delete(_) => true,
        }
    }
}

impl From<GetRequest> for RequestDescriptor {
    fn from(r: GetRequest) -> Self {
        RequestDescriptor::Get(r)
    }
}

impl From<JsonPost> for RequestDescriptor {
    fn from(r: JsonPost) -> Self {
        RequestDescriptor::PostJson(r)
    }
}

impl From<FormPost> for RequestDescriptor {
    fn from(r: FormPost) -> Self {
        RequestDescriptor::PostForm(r)
    }
}

impl From<FileUpload> for RequestDescriptor {
    fn from(r: FileUpload) -> Self {
        RequestDescriptor::PutFile(r)
    }
}

impl From<DeleteRequest> for RequestDescriptor {
    fn from(r: DeleteRequest) -> Self {
        RequestDescriptor::Delete(r)
    }
}
