//! Verify outcome classification against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each case names a verb, whether the call is authenticated, and the status
//! and body the mock server's `/respond/{status}` route should answer with.
//! The call goes over real HTTP so the whole pipeline (headers, body read,
//! classification, error recovery) is exercised.

use std::io::Write;

use mojang_core::{
    DeleteRequest, ErrorKind, FileUpload, FormPost, GetRequest, Hosts, JsonPost, RequestDescriptor, Requester,
    RequesterConfig,
};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct Vectors {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    method: String,
    authenticated: bool,
    status: u16,
    body: String,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct Expected {
    success: bool,
    kind: Option<String>,
    tag: Option<String>,
    message: Option<String>,
}

const TOKEN: &str = "vector-token";

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Transport" => ErrorKind::Transport,
        "Api" => ErrorKind::Api,
        "Protocol" => ErrorKind::Protocol,
        other => panic!("unknown error kind: {other}"),
    }
}

/// Build the descriptor a case describes, aimed at `/respond/{status}`.
fn descriptor(base: &Url, case: &Case, upload: &std::path::Path) -> RequestDescriptor {
    let mut url = base.join(&format!("/respond/{}", case.status)).unwrap();
    if !case.body.is_empty() {
        url.query_pairs_mut().append_pair("body", &case.body);
    }
    match (case.method.as_str(), case.authenticated) {
        ("GET", false) => GetRequest::new(url).into(),
        ("GET", true) => GetRequest::authenticated(url, TOKEN).into(),
        ("POST", false) => JsonPost::new(url, r#"{"vector":true}"#).into(),
        ("POST", true) => FormPost::new(url, TOKEN, vec![("vector".to_string(), "1".to_string())]).into(),
        ("PUT", true) => FileUpload::new(url, TOKEN, upload, false).into(),
        ("DELETE", true) => DeleteRequest::new(url, TOKEN).into(),
        (method, authenticated) => panic!("{}: no request shape for {method} (authenticated: {authenticated})", case.name),
    }
}

#[tokio::test]
async fn classification_test_vectors() {
    let raw = include_str!("../../test-vectors/classification.json");
    let vectors: Vectors = serde_json::from_str(raw).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    tokio::spawn(mock_server::run(listener));

    let mut upload = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    upload.write_all(b"\x89PNG vector payload").unwrap();

    let requester = Requester::new(RequesterConfig::default().with_hosts(Hosts::uniform(base.clone()))).unwrap();

    for case in &vectors.cases {
        let name = &case.name;
        let descriptor = descriptor(&base, case, upload.path());
        assert_eq!(descriptor.method().as_str(), case.method, "{name}: method");
        assert_eq!(descriptor.is_authenticated(), case.authenticated, "{name}: authenticated");

        let response = requester.execute(descriptor).await.unwrap();
        assert_eq!(response.status().map(|s| s.as_u16()), Some(case.status), "{name}: status");
        assert_eq!(response.raw_body(), case.body, "{name}: raw body");
        assert_eq!(response.raw_content(), case.body.as_bytes(), "{name}: raw content");
        assert_eq!(response.is_success(), case.expected.success, "{name}: success");
        assert_eq!(response.error().is_none(), case.expected.success, "{name}: error presence");

        if let Some(error) = response.error() {
            if let Some(kind) = &case.expected.kind {
                assert_eq!(error.kind(), parse_kind(kind), "{name}: kind");
            }
            if let Some(tag) = &case.expected.tag {
                assert_eq!(error.tag(), tag, "{name}: tag");
            }
            if let Some(message) = &case.expected.message {
                assert_eq!(error.message(), message, "{name}: message");
            }
        }
    }
}
