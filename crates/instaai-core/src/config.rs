//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! selects the backend environment, the platform used for OAuth client ids
//! and redirects, and where credentials are stored.
//!
//! Configuration is stored at `~/.config/instaai/config.json`. Environment
//! variables (usually from a `.env` file) override individual fields.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::oauth::{ClientIdTable, OAuthSettings, Platform};
use crate::storage::{CredentialStore, FileStore, KeyringStore, StorageError};

/// Application name used for config/data directory paths
const APP_NAME: &str = "instaai";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEVELOPMENT_API_URL: &str = "http://localhost:8000/api";
const PRODUCTION_API_URL: &str = "https://instaai-studio.onrender.com/api";

/// Per-request timeout for backend calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_API_URL,
            Environment::Production => PRODUCTION_API_URL,
        }
    }
}

/// Connection settings handed to `ApiClient::new`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.api_base_url())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Environment,
    /// Overrides the environment's base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    pub platform: Platform,
    /// Origin of the web app, used to build the web OAuth redirect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_origin: Option<String>,
    pub client_ids: ClientIdTable,
    pub storage: StorageBackend,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `INSTAAI_*` environment variables on top of the file settings
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored, as is an
    /// unknown platform name.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("INSTAAI_API_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(platform) = get("INSTAAI_PLATFORM") {
            match platform.parse() {
                Ok(platform) => self.platform = platform,
                Err(e) => warn!(error = %e, "Ignoring INSTAAI_PLATFORM"),
            }
        }
        if let Some(origin) = get("INSTAAI_WEB_ORIGIN") {
            self.web_origin = Some(origin);
        }

        let ids = &mut self.client_ids;
        for (key, slot) in [
            ("INSTAAI_GOOGLE_WEB_CLIENT_ID", &mut ids.google_web),
            ("INSTAAI_GOOGLE_IOS_CLIENT_ID", &mut ids.google_ios),
            ("INSTAAI_GOOGLE_ANDROID_CLIENT_ID", &mut ids.google_android),
            ("INSTAAI_FACEBOOK_APP_ID", &mut ids.facebook),
            ("INSTAAI_APPLE_CLIENT_ID", &mut ids.apple),
        ] {
            if let Some(value) = get(key) {
                *slot = Some(value);
            }
        }
        self
    }

    pub fn api_config(&self) -> ApiConfig {
        match self.api_base_url {
            Some(ref url) => ApiConfig::new(url.clone()),
            None => ApiConfig::for_environment(self.environment),
        }
    }

    pub fn oauth_settings(&self) -> OAuthSettings {
        OAuthSettings::resolve(self.platform, &self.client_ids, self.web_origin.as_deref())
    }

    /// Open the configured credential backend
    pub fn credential_store(&self) -> Result<CredentialStore, StorageError> {
        Ok(match self.storage {
            StorageBackend::File => CredentialStore::new(FileStore::default_location()?),
            StorageBackend::Keyring => CredentialStore::new(KeyringStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::oauth::OAuthProvider;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_is_development() {
        let config = Config::default();
        let api = config.api_config();
        assert_eq!(api.base_url, "http://localhost:8000/api");
        assert_eq!(api.timeout, Duration::from_secs(30));
        assert_eq!(config.platform, Platform::Web);
        assert_eq!(config.storage, StorageBackend::File);
    }

    #[test]
    fn test_production_url() {
        let config = Config {
            environment: Environment::Production,
            ..Config::default()
        };
        assert_eq!(
            config.api_config().base_url,
            "https://instaai-studio.onrender.com/api"
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().apply_overrides(lookup(&[
            ("INSTAAI_API_URL", "http://10.0.2.2:8000/api"),
            ("INSTAAI_PLATFORM", "android"),
            ("INSTAAI_GOOGLE_ANDROID_CLIENT_ID", "android-id"),
            ("INSTAAI_FACEBOOK_APP_ID", ""),
        ]));

        assert_eq!(config.api_config().base_url, "http://10.0.2.2:8000/api");
        assert_eq!(config.platform, Platform::Android);
        assert_eq!(config.client_ids.google_android.as_deref(), Some("android-id"));
        assert_eq!(config.client_ids.facebook, None);

        let oauth = config.oauth_settings();
        assert!(oauth.is_configured(OAuthProvider::Google));
        assert!(!oauth.is_configured(OAuthProvider::Facebook));
        assert_eq!(oauth.redirect_uri(), "instaai://auth/callback");
    }

    #[test]
    fn test_bad_platform_ignored() {
        let config = Config::default().apply_overrides(lookup(&[("INSTAAI_PLATFORM", "blackberry")]));
        assert_eq!(config.platform, Platform::Web);
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = serde_json::from_str(
            r#"{"environment": "production", "storage": "keyring", "client_ids": {"facebook": "fb"}}"#,
        )
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.storage, StorageBackend::Keyring);
        assert_eq!(config.client_ids.facebook.as_deref(), Some("fb"));
        // Apple keeps its bundle id default
        assert_eq!(config.client_ids.apple.as_deref(), Some("com.instaai.studio"));
    }
}
