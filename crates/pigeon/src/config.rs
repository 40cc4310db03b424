//! Client configuration
//!
//! Backend endpoint and Google OAuth client ID, each resolved from the
//! environment first and the config directory second so deployments and
//! local development override the compiled-in defaults.

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.pigeon.example/v1";

const API_CONFIG_FILE: &str = "api.json";
const GOOGLE_OAUTH_FILE: &str = "google-oauth.json";

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Resolve the backend endpoint: `PIGEON_API_URL` env var, then
    /// `api.json` in the config directory, then the production default.
    /// Invalid URLs are logged and skipped.
    pub fn load() -> Self {
        if let Ok(url) = std::env::var("PIGEON_API_URL")
            && validated(&url, "PIGEON_API_URL")
        {
            return Self { base_url: url };
        }

        if config::config_exists(API_CONFIG_FILE) {
            match config::load_json::<Self>(API_CONFIG_FILE) {
                Ok(config) if validated(&config.base_url, API_CONFIG_FILE) => return config,
                Ok(_) => {}
                Err(e) => warn!("Failed to load {}: {:#}", API_CONFIG_FILE, e),
            }
        }

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Write the endpoint override to the config directory
    pub fn save(&self) -> Result<()> {
        config::save_json(API_CONFIG_FILE, self)
    }
}

fn validated(url: &str, source: &str) -> bool {
    match Url::parse(url) {
        Ok(_) => true,
        Err(e) => {
            warn!("Ignoring invalid base URL from {}: {}", source, e);
            false
        }
    }
}

/// Google OAuth client configuration.
///
/// Only the client ID lives on the device; the backend holds the secret and
/// performs the code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOauthConfig {
    pub client_id: String,
}

impl GoogleOauthConfig {
    /// Resolve the client ID: compiled-in value, then `google-oauth.json`
    /// in the config directory, then the `PIGEON_GOOGLE_CLIENT_ID` env var.
    /// Returns None when no source provides one, in which case Google
    /// sign-in is unavailable.
    pub fn load() -> Option<Self> {
        if let Some(client_id) = option_env!("GOOGLE_CLIENT_ID") {
            return Some(Self {
                client_id: client_id.to_string(),
            });
        }

        if config::config_exists(GOOGLE_OAUTH_FILE) {
            match config::load_json::<Self>(GOOGLE_OAUTH_FILE) {
                Ok(config) => return Some(config),
                Err(e) => warn!("Failed to load {}: {:#}", GOOGLE_OAUTH_FILE, e),
            }
        }

        std::env::var("PIGEON_GOOGLE_CLIENT_ID")
            .ok()
            .filter(|id| !id.is_empty())
            .map(|client_id| Self { client_id })
    }
}
