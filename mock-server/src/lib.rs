//! In-memory stand-in for the Mojang account services.
//!
//! Serves the status, session, profile, statistics, authentication, security
//! and skin routes from one address, seeded with a single account. A few
//! diagnostic routes (`/respond`, `/echo/authorization`, `/echo/body`,
//! `/slow`) let client tests provoke arbitrary statuses, observe what a call
//! carried and run into timeouts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Form, Json, Router,
};
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const SEED_USERNAME: &str = "steve@example.com";
pub const SEED_PASSWORD: &str = "hunter2";
pub const SEED_USER_ID: &str = "9f8e7d6c5b4a39281706f5e4d3c2b1a0";
pub const NOTCH_ID: Uuid = Uuid::from_u128(0x069a79f4_44e9_4726_a5be_fca90e38aaf5);
pub const JEB_ID: Uuid = Uuid::from_u128(0x853c80ef_3c37_49fd_aa49_938b674adae6);
/// Profile lookups for this id are always rate limited.
pub const RATE_LIMITED_ID: Uuid = Uuid::from_u128(0x42);
/// The one texture served under `/texture/{hash}`.
pub const SKIN_TEXTURE_HASH: &str = "6f2dec282967a2e068755da69c251adf944f2fa022eca8e31c0b18a9413305ec";
/// PNG signature and header chunk; not valid UTF-8.
pub const SKIN_TEXTURE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00@\x00\x00\x00@\x08\x06";
/// Delay before `/echo/authorization` answers.
pub const ECHO_DELAY: Duration = Duration::from_millis(50);

const TEXTURES_BASE: &str = "http://textures.minecraft.net/texture";

#[derive(Clone, Debug)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    /// Every name held, oldest first, with the time (ms) it was taken. The
    /// original name has none.
    pub history: Vec<(String, Option<u64>)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skin {
    pub url: String,
    pub slim: bool,
}

#[derive(Debug)]
pub struct Store {
    username: String,
    password: String,
    /// The profile owned by the seeded account.
    owner: Player,
    players: Vec<Player>,
    /// Access token to client token.
    tokens: HashMap<String, String>,
    skins: HashMap<Uuid, Skin>,
}

impl Store {
    pub fn seeded() -> Self {
        let notch = Player {
            id: NOTCH_ID,
            name: "Notch".to_string(),
            history: vec![("Notch".to_string(), None)],
        };
        let jeb = Player {
            id: JEB_ID,
            name: "jeb_".to_string(),
            history: vec![
                ("jeb".to_string(), None),
                ("jeb_".to_string(), Some(1_423_047_925_000)),
            ],
        };
        Self {
            username: SEED_USERNAME.to_string(),
            password: SEED_PASSWORD.to_string(),
            owner: notch.clone(),
            players: vec![notch, jeb],
            tokens: HashMap::new(),
            skins: HashMap::new(),
        }
    }

    fn find(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn check_credentials(&self, username: &str, password: &str) -> Result<(), ApiError> {
        if username == self.username && password == self.password {
            Ok(())
        } else {
            Err(ApiError::forbidden("Invalid credentials. Invalid username or password."))
        }
    }

    fn issue_token(&mut self, client_token: String) -> String {
        let access_token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(access_token.clone(), client_token);
        access_token
    }

    /// Whether `access_token` is live and, when given, issued to `client_token`.
    fn token_matches(&self, access_token: &str, client_token: Option<&str>) -> bool {
        match (self.tokens.get(access_token), client_token) {
            (Some(issued), Some(given)) => issued == given,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Validate the bearer token of a request acting on the `id` profile.
    fn authorize(&self, headers: &HeaderMap, id: Option<Uuid>) -> Result<(), ApiError> {
        let token = bearer(headers).ok_or_else(ApiError::unauthorized)?;
        if !self.tokens.contains_key(token) {
            return Err(ApiError::unauthorized());
        }
        match id {
            Some(id) if id != self.owner.id => Err(ApiError::forbidden(
                "The profile does not belong to this account.",
            )),
            _ => Ok(()),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

/// `{error, errorMessage}` failure as the real services send it.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, "ForbiddenOperationException", message)
    }

    fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "The request requires user authentication",
        )
    }

    fn illegal_argument(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "IllegalArgumentException", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.error, "errorMessage": self.message });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/check", get(check))
        .route("/session/minecraft/profile/{id}", get(profile))
        .route("/profiles/minecraft", post(uuids_by_names))
        .route("/orders/statistics", post(statistics))
        .route("/authenticate", post(authenticate))
        .route("/refresh", post(refresh))
        .route("/validate", post(validate))
        .route("/invalidate", post(invalidate))
        .route("/signout", post(signout))
        .route("/user/profiles/{id}/names", get(name_history))
        .route("/users/profiles/minecraft/{name}", get(uuid_at_time))
        .route("/user/security/location", get(security_location))
        .route("/user/security/challenges", get(security_challenges))
        .route(
            "/user/profile/{id}/skin",
            post(change_skin).put(upload_skin).delete(reset_skin),
        )
        .route("/respond/{code}", any(respond))
        .route("/texture/{hash}", get(texture))
        .route("/echo/authorization", get(echo_authorization))
        .route("/echo/body", post(echo_body))
        .route("/slow/{millis}", get(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

fn player_json(player: &Player) -> Value {
    json!({ "id": player.id.simple().to_string(), "name": player.name })
}

// --- status, profiles, statistics ---

async fn check() -> Json<Value> {
    Json(json!([
        { "minecraft.net": "green" },
        { "session.minecraft.net": "green" },
        { "account.mojang.com": "green" },
        { "authserver.mojang.com": "green" },
        { "sessionserver.mojang.com": "yellow" },
        { "api.mojang.com": "green" },
        { "textures.minecraft.net": "green" },
        { "mojang.com": "red" },
    ]))
}

#[derive(Deserialize)]
struct ProfileQuery {
    unsigned: Option<bool>,
}

async fn profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(query): Query<ProfileQuery>,
) -> Result<Response, ApiError> {
    if id == RATE_LIMITED_ID {
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "TooManyRequestsException",
            "The client has sent too many requests within a certain amount of time",
        ));
    }
    let store = db.read().await;
    let Some(player) = store.find(id) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let signed = query.unsigned == Some(false);
    let mut textures = json!({});
    if let Some(skin) = store.skins.get(&id) {
        let mut entry = json!({ "url": skin.url });
        if skin.slim {
            entry["metadata"] = json!({ "model": "slim" });
        }
        textures["SKIN"] = entry;
    }
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut decoded = json!({
        "timestamp": timestamp,
        "profileId": player.id.simple().to_string(),
        "profileName": player.name,
        "textures": textures,
    });
    if signed {
        decoded["signatureRequired"] = json!(true);
    }

    let engine = base64::engine::general_purpose::STANDARD;
    let mut property = json!({
        "name": "textures",
        "value": engine.encode(decoded.to_string()),
    });
    if signed {
        property["signature"] = json!(engine.encode(format!("signed:{}", player.id.simple())));
    }
    let mut body = player_json(player);
    body["properties"] = json!([property]);
    Ok(Json(body).into_response())
}

async fn uuids_by_names(
    State(db): State<Db>,
    Json(names): Json<Vec<String>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(ApiError::illegal_argument("profileName can not be null or empty."));
    }
    if names.len() > 100 {
        return Err(ApiError::illegal_argument(
            "Not more that 100 profile name per call is allowed.",
        ));
    }
    let store = db.read().await;
    let found = store
        .players
        .iter()
        .filter(|player| names.iter().any(|name| name.eq_ignore_ascii_case(&player.name)))
        .map(player_json)
        .collect();
    Ok(Json(found))
}

async fn name_history(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let store = db.read().await;
    let Some(player) = store.find(id) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let entries: Vec<Value> = player
        .history
        .iter()
        .map(|(name, changed)| match changed {
            Some(at) => json!({ "name": name, "changedToAt": at }),
            None => json!({ "name": name }),
        })
        .collect();
    Json(entries).into_response()
}

#[derive(Deserialize)]
struct AtQuery {
    at: Option<u64>,
}

/// Names are looked up against the current owner only; `at` is accepted and
/// logged.
async fn uuid_at_time(
    State(db): State<Db>,
    Path(name): Path<String>,
    Query(query): Query<AtQuery>,
) -> Response {
    debug!(%name, at = ?query.at, "name lookup");
    let store = db.read().await;
    match store.players.iter().find(|p| p.name.eq_ignore_ascii_case(&name)) {
        Some(player) => Json(player_json(player)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsBody {
    metric_keys: Vec<String>,
}

async fn statistics(Json(body): Json<StatisticsBody>) -> Json<Value> {
    let (mut total, mut last24h, mut velocity) = (0u64, 0u64, 0f64);
    for key in &body.metric_keys {
        let (t, l, v) = match key.as_str() {
            "item_sold_minecraft" => (40_000_000, 9_000, 0.1),
            "prepaid_card_redeemed_minecraft" => (1_000_000, 300, 0.01),
            "item_sold_cobalt" => (300_000, 20, 0.001),
            "item_sold_scrolls" => (200_000, 10, 0.0005),
            _ => (0, 0, 0.0),
        };
        total += t;
        last24h += l;
        velocity += v;
    }
    Json(json!({ "total": total, "last24h": last24h, "saleVelocityPerSeconds": velocity }))
}

// --- authentication ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateBody {
    username: String,
    password: String,
    client_token: Option<String>,
    #[serde(default)]
    request_user: bool,
}

async fn authenticate(
    State(db): State<Db>,
    Json(body): Json<AuthenticateBody>,
) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    store.check_credentials(&body.username, &body.password)?;
    let client_token = body
        .client_token
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
    let access_token = store.issue_token(client_token.clone());
    info!(username = %body.username, "issued access token");

    let owner = player_json(&store.owner);
    let mut session = json!({
        "accessToken": access_token,
        "clientToken": client_token,
        "availableProfiles": [owner.clone()],
        "selectedProfile": owner,
    });
    if body.request_user {
        session["user"] = json!({
            "id": SEED_USER_ID,
            "properties": [{ "name": "preferredLanguage", "value": "en" }],
        });
    }
    Ok(Json(session))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBody {
    access_token: String,
    client_token: Option<String>,
}

async fn refresh(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    if !store.token_matches(&body.access_token, body.client_token.as_deref()) {
        return Err(ApiError::forbidden("Invalid token."));
    }
    let client_token = store.tokens.remove(&body.access_token).unwrap_or_default();
    let access_token = store.issue_token(client_token.clone());
    Ok(Json(json!({
        "accessToken": access_token,
        "clientToken": client_token,
        "selectedProfile": player_json(&store.owner),
    })))
}

async fn validate(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<StatusCode, ApiError> {
    let store = db.read().await;
    if store.token_matches(&body.access_token, body.client_token.as_deref()) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::forbidden("Invalid token."))
    }
}

async fn invalidate(State(db): State<Db>, Json(body): Json<TokenBody>) -> StatusCode {
    let mut store = db.write().await;
    if store.token_matches(&body.access_token, body.client_token.as_deref()) {
        store.tokens.remove(&body.access_token);
    }
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct SignoutBody {
    username: String,
    password: String,
}

async fn signout(
    State(db): State<Db>,
    Json(body): Json<SignoutBody>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store.check_credentials(&body.username, &body.password)?;
    let revoked = store.tokens.len();
    store.tokens.clear();
    info!(revoked, "signed out");
    Ok(StatusCode::NO_CONTENT)
}

async fn security_location(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    db.read().await.authorize(&headers, None)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn security_challenges(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    db.read().await.authorize(&headers, None)?;
    Ok(Json(json!([
        { "answer": { "id": 101 }, "question": { "id": 1, "question": "What is your favorite pet's name?" } },
        { "answer": { "id": 102 }, "question": { "id": 4, "question": "What was the first concert you attended?" } },
        { "answer": { "id": 103 }, "question": { "id": 9, "question": "In what city were you born?" } },
    ])))
}

// --- skins ---

#[derive(Deserialize)]
struct SkinForm {
    #[serde(default)]
    model: String,
    url: String,
}

async fn change_skin(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Form(form): Form<SkinForm>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store.authorize(&headers, Some(id))?;
    let skin = Skin {
        url: form.url,
        slim: form.model == "slim",
    };
    debug!(%id, url = %skin.url, "skin changed");
    store.skins.insert(id, skin);
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_skin(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    db.read().await.authorize(&headers, Some(id))?;

    let mut slim = false;
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::illegal_argument(&e.body_text()))?
    {
        match field.name() {
            Some("model") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::illegal_argument(&e.body_text()))?;
                slim = text == "true" || text == "slim";
            }
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::illegal_argument(&e.body_text()))?;
                file = Some(bytes);
            }
            _ => {}
        }
    }
    let Some(bytes) = file.filter(|b| !b.is_empty()) else {
        return Err(ApiError::illegal_argument("No skin file was uploaded."));
    };

    let skin = Skin {
        url: format!("{TEXTURES_BASE}/{}", Uuid::new_v4().simple()),
        slim,
    };
    debug!(%id, size = bytes.len(), slim, "skin uploaded");
    db.write().await.skins.insert(id, skin);
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_skin(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store.authorize(&headers, Some(id))?;
    store.skins.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- diagnostics ---

#[derive(Deserialize)]
struct RespondQuery {
    body: Option<String>,
}

/// Answer any method with the requested status and body.
async fn respond(Path(code): Path<u16>, Query(query): Query<RespondQuery>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) if status.as_u16() >= 200 => (status, query.body.unwrap_or_default()).into_response(),
        _ => (StatusCode::BAD_REQUEST, format!("unsupported status {code}")).into_response(),
    }
}

async fn texture(Path(hash): Path<String>) -> Response {
    if hash == SKIN_TEXTURE_HASH {
        ([(CONTENT_TYPE, "image/png")], SKIN_TEXTURE_PNG).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Report the content type and exact bytes of a posted body.
async fn echo_body(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    debug!(content_type, len = body.len(), "echoing body");
    Json(json!({ "contentType": content_type, "bytes": body.to_vec() }))
}

async fn echo_authorization(headers: HeaderMap) -> Result<String, ApiError> {
    let token = bearer(&headers).map(str::to_owned).ok_or_else(ApiError::unauthorized)?;
    tokio::time::sleep(ECHO_DELAY).await;
    Ok(token)
}

async fn slow(Path(millis): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "done"
}
