//! Domain DTOs for the account services.
//!
//! # Design
//! These mirror the remote JSON shapes but are defined independently of the
//! mock-server crate; integration tests catch schema drift between the two.

use base64::Engine as _;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A player identity as returned by the profile and authentication APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerId {
    pub id: Uuid,
    pub name: String,
    #[serde(default, alias = "legacyProfile")]
    pub legacy: bool,
    #[serde(default)]
    pub demo: bool,
}

/// Health of one remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    Green,
    Yellow,
    Red,
    #[default]
    Unknown,
}

impl ServiceStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" => ServiceStatus::Green,
            "yellow" => ServiceStatus::Yellow,
            "red" => ServiceStatus::Red,
            _ => ServiceStatus::Unknown,
        }
    }
}

/// Status of every service reported by the status API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiStatus {
    pub minecraft: ServiceStatus,
    pub sessions: ServiceStatus,
    pub accounts: ServiceStatus,
    pub auth_server: ServiceStatus,
    pub session_server: ServiceStatus,
    pub api: ServiceStatus,
    pub textures: ServiceStatus,
    pub mojang: ServiceStatus,
}

/// Credentials for the authentication server.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A user property attached to an authentication session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProperty {
    pub name: String,
    pub value: String,
}

/// Account data returned when `requestUser` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserData {
    pub id: String,
    #[serde(default)]
    pub properties: Vec<UserProperty>,
}

/// Tokens and profiles returned by a successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub client_token: String,
    #[serde(default)]
    pub available_profiles: Vec<PlayerId>,
    pub selected_profile: Option<PlayerId>,
    pub user: Option<UserData>,
}

/// Sales figures from the statistics API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    pub total: u64,
    pub last24h: u64,
    pub sale_velocity_per_seconds: f64,
}

/// One entry of a player's name history. The original name has no change
/// date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NameChange {
    pub name: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub changed_to_at: Option<u64>,
}

/// A security question of the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Id to send back with the answer.
    pub answer_id: u64,
    pub question_id: u64,
    pub question: String,
}

/// A profile with its decoded textures property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub textures: Option<Textures>,
}

/// Contents of the base64 `textures` profile property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Textures {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub profile_id: String,
    pub profile_name: String,
    pub signature_required: bool,
    pub skin_url: Option<Url>,
    pub cape_url: Option<Url>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextures {
    timestamp: u64,
    profile_id: String,
    profile_name: String,
    #[serde(default)]
    signature_required: bool,
    #[serde(default)]
    textures: RawTextureSet,
}

#[derive(Deserialize, Default)]
struct RawTextureSet {
    #[serde(rename = "SKIN")]
    skin: Option<RawTexture>,
    #[serde(rename = "CAPE")]
    cape: Option<RawTexture>,
}

#[derive(Deserialize)]
struct RawTexture {
    url: Option<Url>,
}

/// Errors decoding the textures property.
#[derive(Debug, thiserror::Error)]
pub enum TexturesError {
    #[error("textures property is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("textures property is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Textures {
    /// Decode the base64 JSON value of a `textures` property.
    pub fn decode(value: &str) -> Result<Self, TexturesError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(value.trim())?;
        let raw: RawTextures = serde_json::from_slice(&bytes)?;
        Ok(Self {
            timestamp: raw.timestamp,
            profile_id: raw.profile_id,
            profile_name: raw.profile_name,
            signature_required: raw.signature_required,
            skin_url: raw.textures.skin.and_then(|t| t.url),
            cape_url: raw.textures.cape.and_then(|t| t.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("steve@example.com", "hunter2");
        let printed = format!("{credentials:?}");
        assert!(printed.contains("steve@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn player_id_accepts_undashed_uuid_and_legacy_alias() {
        let player: PlayerId = serde_json::from_str(
            r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch","legacyProfile":true}"#,
        )
        .unwrap();
        assert_eq!(player.name, "Notch");
        assert!(player.legacy);
        assert!(!player.demo);
        assert_eq!(player.id.simple().to_string(), "069a79f444e94726a5befca90e38aaf5");
    }

    #[test]
    fn service_status_parses_case_insensitively() {
        assert_eq!(ServiceStatus::parse("green"), ServiceStatus::Green);
        assert_eq!(ServiceStatus::parse("YELLOW"), ServiceStatus::Yellow);
        assert_eq!(ServiceStatus::parse("red"), ServiceStatus::Red);
        assert_eq!(ServiceStatus::parse("purple"), ServiceStatus::Unknown);
    }

    #[test]
    fn textures_decode_skin_and_missing_cape() {
        let json = r#"{"timestamp":1500000000000,"profileId":"abc","profileName":"Steve",
            "textures":{"SKIN":{"url":"http://textures.minecraft.net/texture/123"}}}"#;
        let encoded = base64::engine::general_purpose::STANDARD.encode(json);
        let textures = Textures::decode(&encoded).unwrap();
        assert_eq!(textures.timestamp, 1_500_000_000_000);
        assert_eq!(textures.profile_name, "Steve");
        assert!(!textures.signature_required);
        assert_eq!(
            textures.skin_url.unwrap().as_str(),
            "http://textures.minecraft.net/texture/123"
        );
        assert!(textures.cape_url.is_none());
    }

    #[test]
    fn textures_reject_bad_base64() {
        assert!(matches!(Textures::decode("%%%"), Err(TexturesError::Base64(_))));
    }

    #[test]
    fn session_reads_camel_case_fields() {
        let session: Session = serde_json::from_str(
            r#"{"accessToken":"a","clientToken":"c","availableProfiles":[],"selectedProfile":null}"#,
        )
        .unwrap();
        assert_eq!(session.access_token, "a");
        assert!(session.selected_profile.is_none());
        assert!(session.user.is_none());
    }
}
