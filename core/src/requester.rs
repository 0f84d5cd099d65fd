//! Executes request descriptors and classifies their outcome.
//!
//! # Design
//! `Requester` owns one `reqwest::Client` (and therefore one connection
//! pool) built without default headers. Every operation assembles its own
//! header set, performs the call, reads the whole body whatever the status,
//! then hands status and body to `classify`, which is pure and holds the
//! success rule and the structured-error recovery.
//!
//! Bodies travel in the configured charset both ways: JSON request bodies
//! are encoded with it, and response bodies that declare no charset are
//! decoded with it. The undecoded bytes stay on the `Response`.
//!
//! Operations return `Err` only for precondition violations. Every network
//! outcome, including timeouts and unreadable bodies, comes back as an
//! `Ok(Response)`.

use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::{Hosts, RequesterConfig};
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::{ConfigError, PreconditionError, ResponseError, TransportError};
use crate::http::{auth_headers, HttpMethod};
use crate::request::{DeleteRequest, FileUpload, FormPost, GetRequest, JsonPost, RequestDescriptor};
use crate::response::Response;

/// Async executor for request descriptors. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct Requester {
    client: reqwest::Client,
    config: Arc<RequesterConfig>,
    client_token: Uuid,
}

impl Requester {
    pub fn new(config: RequesterConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::Client)?;
        let client_token = config.client_token.unwrap_or_else(Uuid::new_v4);
        Ok(Self {
            client,
            config: Arc::new(config),
            client_token,
        })
    }

    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    pub fn hosts(&self) -> &Hosts {
        &self.config.hosts
    }

    /// Token identifying this client to the authentication server.
    pub fn client_token(&self) -> Uuid {
        self.client_token
    }

    /// Build, execute and parse an endpoint call.
    pub async fn perform<E: Endpoint>(&self, endpoint: E) -> Result<E::Output, PreconditionError> {
        let ctx = EndpointContext {
            hosts: &self.config.hosts,
            client_token: self.client_token,
        };
        let descriptor = endpoint.descriptor(&ctx)?;
        let response = self.execute(descriptor).await?;
        Ok(endpoint.parse(response))
    }

    /// Execute any descriptor, dispatching on its shape.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<Response, PreconditionError> {
        match descriptor {
            RequestDescriptor::Get(r) => self.get(r).await,
            RequestDescriptor::PostJson(r) => self.post_json(r).await,
            RequestDescriptor::PostForm(r) => self.post_form(r).await,
            RequestDescriptor::PutFile(r) => self.put_file(r).await,
            RequestDescriptor::Delete(r) => self.delete(r).await,
        }
    }

    pub async fn get(&self, request: GetRequest) -> Result<Response, PreconditionError> {
        let GetRequest { url, token } = request;
        let mut builder = self.client.get(url.clone());
        if let Some(token) = &token {
            builder = builder.headers(auth_headers(token)?);
        }
        Ok(self.dispatch(HttpMethod::Get, &url, token.is_some(), builder).await)
    }

    pub async fn post_json(&self, request: JsonPost) -> Result<Response, PreconditionError> {
        let JsonPost { url, body } = request;
        let body = body.ok_or(PreconditionError::MissingBody)?;
        let body = encode_body(&self.config.charset, &body)?;
        let builder = self
            .client
            .post(url.clone())
            .header(
                CONTENT_TYPE,
                format!("application/json; charset={}", self.config.charset),
            )
            .body(body);
        Ok(self.dispatch(HttpMethod::Post, &url, false, builder).await)
    }

    pub async fn post_form(&self, request: FormPost) -> Result<Response, PreconditionError> {
        let FormPost { url, token, fields } = request;
        if fields.is_empty() {
            return Err(PreconditionError::EmptyForm);
        }
        let builder = self
            .client
            .post(url.clone())
            .headers(auth_headers(&token)?)
            .form(&fields);
        Ok(self.dispatch(HttpMethod::Post, &url, true, builder).await)
    }

    pub async fn put_file(&self, request: FileUpload) -> Result<Response, PreconditionError> {
        let FileUpload {
            url,
            token,
            file,
            slim_model,
        } = request;
        let path = file.ok_or(PreconditionError::MissingFile)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(PreconditionError::FileNotFound { path }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PreconditionError::FileNotFound { path })
            }
            Err(source) => return Err(PreconditionError::FileRead { path, source }),
        }
        let headers = auth_headers(&token)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) => return Err(PreconditionError::FileRead { path, source }),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let form = Form::new()
            .text("model", if slim_model { "true" } else { "false" })
            .part("file", Part::bytes(bytes).file_name(file_name));
        let builder = self.client.put(url.clone()).headers(headers).multipart(form);
        Ok(self.dispatch(HttpMethod::Put, &url, true, builder).await)
    }

    pub async fn delete(&self, request: DeleteRequest) -> Result<Response, PreconditionError> {
        let DeleteRequest { url, token } = request;
        let builder = self.client.delete(url.clone()).headers(auth_headers(&token)?);
        Ok(self.dispatch(HttpMethod::Delete, &url, true, builder).await)
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: &Url,
        authenticated: bool,
        builder: RequestBuilder,
    ) -> Response {
        debug!(%method, %url, authenticated, "dispatching request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, %url, error = %err, "request failed before a response arrived");
                let status = err.status();
                let error = ResponseError::from_transport(TransportError::Http(err));
                return Response::failure(method, status, String::new(), error);
            }
        };

        let status = response.status();
        let charset = declared_charset(response.headers());
        let raw_content = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%method, %url, status = status.as_u16(), error = %err, "failed to read response body");
                let error = ResponseError::from_transport(TransportError::Http(err));
                return Response::failure(method, Some(status), String::new(), error);
            }
        };
        let raw_body = decode_body(charset.as_deref().unwrap_or(&self.config.charset), &raw_content);

        let outcome = classify(method, authenticated, status, raw_body).with_raw_content(raw_content);
        debug!(
            %method,
            %url,
            status = status.as_u16(),
            success = outcome.is_success(),
            "request completed"
        );
        outcome
    }
}

/// Encode a request body in `charset`.
fn encode_body(charset: &str, text: &str) -> Result<Vec<u8>, PreconditionError> {
    let encoding =
        Encoding::for_label(charset.trim().as_bytes()).ok_or_else(|| PreconditionError::UnknownCharset {
            label: charset.to_string(),
        })?;
    let (bytes, _, _) = encoding.encode(text);
    Ok(bytes.into_owned())
}

/// Decode a response body. Unknown labels fall back to UTF-8.
fn decode_body(charset: &str, bytes: &[u8]) -> String {
    let encoding = Encoding::for_label(charset.trim().as_bytes()).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// The `charset` parameter of the response's `Content-Type`, if any.
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Apply the success rule to a completed call and recover the error.
///
/// Structured `{error, errorMessage}` bodies are only looked for on 401/403
/// answers to authenticated calls; every other failure is keyed by status.
pub(crate) fn classify(
    method: HttpMethod,
    authenticated: bool,
    status: StatusCode,
    raw_body: String,
) -> Response {
    if method.is_success(status) {
        return Response::success(method, status, raw_body);
    }

    let error = if status.is_success() {
        ResponseError::disallowed(status)
    } else {
        let auth_failure = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
        let structured = if authenticated && auth_failure {
            ResponseError::from_body(&raw_body, status)
        } else {
            None
        };
        structured.unwrap_or_else(|| ResponseError::from_status(status))
    };
    Response::failure(method, Some(status), raw_body, error)
}
