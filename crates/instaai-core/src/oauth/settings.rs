//! Per-platform OAuth client configuration.
//!
//! Client identifiers come from a `(provider, platform)` table that is
//! resolved once at startup into `OAuthSettings`. Only Google registers a
//! separate client per platform; Facebook and Apple use one identifier
//! everywhere.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OAuthProvider;

/// Redirect target for the iOS and Android apps (deep link scheme)
pub const NATIVE_REDIRECT_URI: &str = "instaai://auth/callback";

/// Web origin used when none is configured (Expo dev server)
pub const DEFAULT_WEB_ORIGIN: &str = "http://localhost:8081";

/// Apple Services ID, which is the app bundle identifier
const DEFAULT_APPLE_CLIENT_ID: &str = "com.instaai.studio";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Web,
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    pub fn is_native(&self) -> bool {
        !matches!(self, Platform::Web)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" => Ok(Platform::Web),
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

/// Client identifiers registered with each provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientIdTable {
    pub google_web: Option<String>,
    pub google_ios: Option<String>,
    pub google_android: Option<String>,
    pub facebook: Option<String>,
    pub apple: Option<String>,
}

impl Default for ClientIdTable {
    fn default() -> Self {
        Self {
            google_web: None,
            google_ios: None,
            google_android: None,
            facebook: None,
            apple: Some(DEFAULT_APPLE_CLIENT_ID.to_string()),
        }
    }
}

impl ClientIdTable {
    pub fn lookup(&self, provider: OAuthProvider, platform: Platform) -> Option<&str> {
        let id = match (provider, platform) {
            (OAuthProvider::Google, Platform::Web) => &self.google_web,
            (OAuthProvider::Google, Platform::Ios) => &self.google_ios,
            (OAuthProvider::Google, Platform::Android) => &self.google_android,
            (OAuthProvider::Facebook, _) => &self.facebook,
            (OAuthProvider::Apple, _) => &self.apple,
        };
        id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// What the flow needs to start an attempt with one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub client_id: String,
    pub scopes: Vec<String>,
}

/// OAuth configuration resolved for the running platform.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    platform: Platform,
    redirect_uri: String,
    providers: HashMap<OAuthProvider, ProviderSettings>,
}

impl OAuthSettings {
    /// Resolve client ids and the redirect target for `platform`.
    /// Providers without a client id for this platform are left out.
    pub fn resolve(platform: Platform, table: &ClientIdTable, web_origin: Option<&str>) -> Self {
        let providers = OAuthProvider::ALL
            .iter()
            .filter_map(|&provider| {
                let client_id = table.lookup(provider, platform)?;
                let scopes = provider
                    .default_scopes()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                Some((
                    provider,
                    ProviderSettings {
                        client_id: client_id.to_string(),
                        scopes,
                    },
                ))
            })
            .collect();

        Self {
            platform,
            redirect_uri: Self::redirect_uri_for(platform, web_origin),
            providers,
        }
    }

    pub fn redirect_uri_for(platform: Platform, web_origin: Option<&str>) -> String {
        if platform.is_native() {
            return NATIVE_REDIRECT_URI.to_string();
        }
        let origin = web_origin.unwrap_or(DEFAULT_WEB_ORIGIN).trim_end_matches('/');
        format!("{}/auth/callback", origin)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn provider(&self, provider: OAuthProvider) -> Option<&ProviderSettings> {
        self.providers.get(&provider)
    }

    pub fn is_configured(&self, provider: OAuthProvider) -> bool {
        self.providers.contains_key(&provider)
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ClientIdTable {
        ClientIdTable {
            google_web: Some("web.apps.googleusercontent.com".to_string()),
            google_ios: Some("ios.apps.googleusercontent.com".to_string()),
            google_android: Some("android.apps.googleusercontent.com".to_string()),
            facebook: Some("fb-app".to_string()),
            apple: Some("com.instaai.studio".to_string()),
        }
    }

    #[test]
    fn test_google_client_id_varies_by_platform() {
        let table = table();
        assert_eq!(
            table.lookup(OAuthProvider::Google, Platform::Web),
            Some("web.apps.googleusercontent.com")
        );
        assert_eq!(
            table.lookup(OAuthProvider::Google, Platform::Ios),
            Some("ios.apps.googleusercontent.com")
        );
        assert_eq!(
            table.lookup(OAuthProvider::Google, Platform::Android),
            Some("android.apps.googleusercontent.com")
        );
    }

    #[test]
    fn test_other_providers_ignore_platform() {
        let table = table();
        for platform in [Platform::Web, Platform::Ios, Platform::Android] {
            assert_eq!(table.lookup(OAuthProvider::Facebook, platform), Some("fb-app"));
            assert_eq!(
                table.lookup(OAuthProvider::Apple, platform),
                Some("com.instaai.studio")
            );
        }
    }

    #[test]
    fn test_resolve_skips_unconfigured() {
        let settings = OAuthSettings::resolve(Platform::Ios, &ClientIdTable::default(), None);
        assert!(!settings.is_configured(OAuthProvider::Google));
        assert!(!settings.is_configured(OAuthProvider::Facebook));
        assert_eq!(
            settings.provider(OAuthProvider::Apple).map(|p| p.client_id.as_str()),
            Some("com.instaai.studio")
        );
    }

    #[test]
    fn test_redirect_uri() {
        assert_eq!(
            OAuthSettings::redirect_uri_for(Platform::Web, None),
            "http://localhost:8081/auth/callback"
        );
        assert_eq!(
            OAuthSettings::redirect_uri_for(Platform::Web, Some("https://app.instaai.studio/")),
            "https://app.instaai.studio/auth/callback"
        );
        assert_eq!(
            OAuthSettings::redirect_uri_for(Platform::Android, Some("https://ignored")),
            NATIVE_REDIRECT_URI
        );
    }

    #[test]
    fn test_resolved_scopes() {
        let settings = OAuthSettings::resolve(Platform::Web, &table(), None);
        let facebook = settings.provider(OAuthProvider::Facebook).unwrap();
        assert!(facebook.scopes.iter().any(|s| s == "instagram_content_publish"));
        assert_eq!(
            settings.provider(OAuthProvider::Google).unwrap().scopes,
            vec!["profile", "email"]
        );
    }
}
