use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{
    app, JEB_ID, NOTCH_ID, RATE_LIMITED_ID, SEED_PASSWORD, SEED_USERNAME, SKIN_TEXTURE_HASH, SKIN_TEXTURE_PNG,
};
use serde_json::Value;
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn with_bearer(method: &str, uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

fn credentials_body() -> String {
    format!(r#"{{"username":"{SEED_USERNAME}","password":"{SEED_PASSWORD}","clientToken":"client-1","requestUser":true}}"#)
}

// --- status and profiles ---

#[tokio::test]
async fn check_lists_single_entry_objects() {
    let resp = app().oneshot(get("/check")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let entries = body_json(resp).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 8);
    assert!(entries.iter().all(|e| e.as_object().unwrap().len() == 1));
}

#[tokio::test]
async fn unknown_profile_answers_no_content() {
    let uri = format!("/session/minecraft/profile/{}", uuid::Uuid::nil().simple());
    let resp = app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn signed_profile_carries_signature() {
    let uri = format!("/session/minecraft/profile/{}?unsigned=false", NOTCH_ID.simple());
    let resp = app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = body_json(resp).await;
    assert_eq!(profile["name"], "Notch");
    assert_eq!(profile["properties"][0]["name"], "textures");
    assert!(profile["properties"][0]["signature"].is_string());
}

#[tokio::test]
async fn rate_limited_profile_has_structured_body() {
    let uri = format!("/session/minecraft/profile/{}", RATE_LIMITED_ID.simple());
    let resp = app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(resp).await["error"], "TooManyRequestsException");
}

#[tokio::test]
async fn names_resolve_case_insensitively() {
    let resp = app()
        .oneshot(json_request("POST", "/profiles/minecraft", r#"["notch","JEB_","nobody"]"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let players = body_json(resp).await;
    assert_eq!(players.as_array().unwrap().len(), 2);
    assert_eq!(players[1]["id"], JEB_ID.simple().to_string());
}

#[tokio::test]
async fn empty_name_is_bad_request() {
    let resp = app()
        .oneshot(json_request("POST", "/profiles/minecraft", r#"["Notch",""]"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "IllegalArgumentException");
}

#[tokio::test]
async fn statistics_sum_requested_metrics() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/orders/statistics",
            r#"{"metricKeys":["item_sold_minecraft","item_sold_cobalt"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = body_json(resp).await;
    assert_eq!(stats["total"], 40_300_000);
    assert_eq!(stats["last24h"], 9_020);
}

#[tokio::test]
async fn name_history_lists_changes() {
    let uri = format!("/user/profiles/{}/names", JEB_ID.simple());
    let resp = app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history = body_json(resp).await;
    assert!(history[0].get("changedToAt").is_none());
    assert_eq!(history[1]["changedToAt"], 1_423_047_925_000u64);
}

#[tokio::test]
async fn unknown_name_at_time_answers_no_content() {
    let resp = app()
        .oneshot(get("/users/profiles/minecraft/nobody?at=1500000000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn texture_serves_png_bytes() {
    let resp = app().oneshot(get(&format!("/texture/{SKIN_TEXTURE_HASH}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "image/png");
    assert_eq!(&body_bytes(resp).await[..], SKIN_TEXTURE_PNG);
}

#[tokio::test]
async fn unknown_texture_is_not_found() {
    let hash = &SKIN_TEXTURE_HASH[..SKIN_TEXTURE_HASH.len() - 1];
    let resp = app().oneshot(get(&format!("/texture/{hash}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- authentication ---

#[tokio::test]
async fn wrong_password_is_forbidden() {
    let body = format!(r#"{{"username":"{SEED_USERNAME}","password":"nope"}}"#);
    let resp = app().oneshot(json_request("POST", "/authenticate", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let error = body_json(resp).await;
    assert_eq!(error["error"], "ForbiddenOperationException");
    assert!(error["errorMessage"].as_str().unwrap().starts_with("Invalid credentials"));
}

#[tokio::test]
async fn security_location_requires_token() {
    let resp = app().oneshot(get("/user/security/location")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Unauthorized");
}

// --- diagnostics ---

#[tokio::test]
async fn respond_echoes_status_and_body() {
    let resp = app()
        .oneshot(Request::builder().method("DELETE").uri("/respond/503?body=down").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"down");
}

#[tokio::test]
async fn respond_rejects_informational_codes() {
    let resp = app().oneshot(get("/respond/100")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn echo_returns_bearer_token() {
    let resp = app()
        .oneshot(with_bearer("GET", "/echo/authorization", "token-a"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"token-a");
}

#[tokio::test]
async fn echo_body_reports_exact_bytes() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo/body")
                .header(http::header::CONTENT_TYPE, "application/json; charset=iso-8859-1")
                .body(String::from("\"a\""))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let echoed = body_json(resp).await;
    assert_eq!(echoed["contentType"], "application/json; charset=iso-8859-1");
    assert_eq!(echoed["bytes"], serde_json::json!([34, 97, 34]));
}

// --- full account lifecycle ---

#[tokio::test]
async fn account_lifecycle() {
    let mut app = app().into_service();
    let skin_uri = format!("/user/profile/{}/skin", NOTCH_ID.simple());

    // authenticate
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/authenticate", &credentials_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let session = body_json(resp).await;
    assert_eq!(session["clientToken"], "client-1");
    assert_eq!(session["selectedProfile"]["name"], "Notch");
    assert_eq!(session["user"]["properties"][0]["value"], "en");
    let token = session["accessToken"].as_str().unwrap().to_string();

    // validate
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/validate",
            &format!(r#"{{"accessToken":"{token}","clientToken":"client-1"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // change skin with a form post
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("POST")
                .uri(&skin_uri)
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("model=slim&url=http%3A%2F%2Fexample.com%2Fskin.png".to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // profile reflects the new skin
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/session/minecraft/profile/{}", NOTCH_ID.simple())))
        .await
        .unwrap();
    let profile = body_json(resp).await;
    let encoded = profile["properties"][0]["value"].as_str().unwrap();
    use base64::Engine as _;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
    let textures: Value = serde_json::from_slice(&decoded).unwrap();
    assert_eq!(textures["textures"]["SKIN"]["url"], "http://example.com/skin.png");
    assert_eq!(textures["textures"]["SKIN"]["metadata"]["model"], "slim");

    // upload a skin file
    let boundary = "mock-boundary";
    let multipart = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"model\"\r\n\r\nfalse\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"skin.png\"\r\n\
         Content-Type: application/octet-stream\r\n\r\nPNGDATA\r\n--{boundary}--\r\n"
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("PUT")
                .uri(&skin_uri)
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(multipart)
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // someone else's profile is off limits
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(with_bearer(
            "DELETE",
            &format!("/user/profile/{}/skin", JEB_ID.simple()),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // reset
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(with_bearer("DELETE", &skin_uri, &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // signout revokes every token
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/signout",
            &format!(r#"{{"username":"{SEED_USERNAME}","password":"{SEED_PASSWORD}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(with_bearer("GET", "/user/security/location", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
