//! Requester configuration.
//!
//! Timeout and response charset are the only transport knobs. Both can be
//! overridden from the environment with `MOJANG_HTTP_TIMEOUT_SECS` and
//! `MOJANG_CHARSET`.

use std::env;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::error::PreconditionError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Base addresses of the remote services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hosts {
    pub status: Url,
    pub session: Url,
    pub api: Url,
    pub auth: Url,
    pub textures: Url,
}

impl Hosts {
    /// Production Mojang hosts.
    pub fn mojang() -> Self {
        Self {
            status: parse_static("https://status.mojang.com"),
            session: parse_static("https://sessionserver.mojang.com"),
            api: parse_static("https://api.mojang.com"),
            auth: parse_static("https://authserver.mojang.com"),
            textures: parse_static("http://textures.minecraft.net"),
        }
    }

    /// Route every service to one base address (mock servers, proxies).
    /// A path on `base` is kept as a prefix of every endpoint path.
    pub fn uniform(base: Url) -> Self {
        Self {
            status: base.clone(),
            session: base.clone(),
            api: base.clone(),
            auth: base.clone(),
            textures: base,
        }
    }

    pub fn status_url(&self, path: &str) -> Result<Url, PreconditionError> {
        join(&self.status, path)
    }

    pub fn session_url(&self, path: &str) -> Result<Url, PreconditionError> {
        join(&self.session, path)
    }

    pub fn api_url(&self, path: &str) -> Result<Url, PreconditionError> {
        join(&self.api, path)
    }

    pub fn auth_url(&self, path: &str) -> Result<Url, PreconditionError> {
        join(&self.auth, path)
    }

    pub fn textures_url(&self, path: &str) -> Result<Url, PreconditionError> {
        join(&self.textures, path)
    }
}

impl Default for Hosts {
    fn default() -> Self {
        Self::mojang()
    }
}

fn parse_static(s: &str) -> Url {
    // Compile-time constants above; a failure here is a typo in this file.
    Url::parse(s).unwrap_or_else(|e| panic!("invalid built-in host {s}: {e}"))
}

/// Append `path` below the base's own path. Endpoint paths are absolute and
/// are joined as relative references onto a base ending in `/`.
fn join(base: &Url, path: &str) -> Result<Url, PreconditionError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|source| PreconditionError::InvalidAddress {
            path: path.to_string(),
            source,
        })
}

/// Settings for a `Requester`.
#[derive(Debug, Clone)]
pub struct RequesterConfig {
    /// Upper bound for one call, including reading the body.
    pub timeout: Duration,
    /// Charset used to decode bodies that do not declare one, and declared on
    /// JSON request bodies.
    pub charset: String,
    pub hosts: Hosts,
    /// Identifies this client instance to the authentication server. A random
    /// one is generated when unset.
    pub client_token: Option<Uuid>,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            charset: DEFAULT_CHARSET.to_string(),
            hosts: Hosts::default(),
            client_token: None,
        }
    }
}

impl RequesterConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env::var("MOJANG_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(charset) = env::var("MOJANG_CHARSET") {
            if !charset.trim().is_empty() {
                config.charset = charset.trim().to_string();
            }
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_hosts(mut self, hosts: Hosts) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_client_token(mut self, token: Uuid) -> Self {
        self.client_token = Some(token);
        self
    }
}
