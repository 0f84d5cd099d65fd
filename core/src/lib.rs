//! Async client core for the Mojang account services.
//!
//! # Overview
//! A `Requester` executes request descriptors (GET, JSON POST, form POST,
//! multipart PUT, DELETE) against a shared connection pool and turns every
//! outcome into a classified `Response`. Endpoints on top of it describe one
//! remote operation each and read the classified outcome into domain types.
//!
//! # Design
//! - Headers are built per call. Nothing call-specific lives on the shared
//!   client, so concurrent calls with different tokens never see each
//!   other's credentials.
//! - Precondition violations (missing token, body, form fields or file) are
//!   the only `Err` values; network and protocol failures are data inside an
//!   `Ok(Response)`.
//! - Success is decided by the method's allowed status set. `204 No Content`
//!   counts only for GET; endpoints that expect it elsewhere opt in with
//!   `Response::accept_no_content`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod config;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod request;
pub mod requester;
pub mod response;
pub mod types;

pub use config::{Hosts, RequesterConfig};
pub use endpoint::{Endpoint, EndpointContext};
pub use error::{ConfigError, ErrorKind, PreconditionError, ResponseError, TransportError};
pub use http::HttpMethod;
pub use request::{DeleteRequest, FileUpload, FormPost, GetRequest, JsonPost, RequestDescriptor};
pub use requester::Requester;
pub use response::{Response, TypedResponse};
pub use types::{
    ApiStatus, Challenge, Credentials, NameChange, PlayerId, Profile, SalesStatistics, ServiceStatus, Session,
    Textures, UserData, UserProperty,
};
