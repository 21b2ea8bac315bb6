use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity providers offered on the sign-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Facebook,
    Apple,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [
        OAuthProvider::Google,
        OAuthProvider::Facebook,
        OAuthProvider::Apple,
    ];

    /// Identifier used in backend paths and results
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
            OAuthProvider::Apple => "apple",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Facebook => "Facebook",
            OAuthProvider::Apple => "Apple",
        }
    }

    pub fn authorization_endpoint(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OAuthProvider::Facebook => "https://www.facebook.com/v18.0/dialog/oauth",
            OAuthProvider::Apple => "https://appleid.apple.com/auth/authorize",
        }
    }

    /// Facebook also asks for the Instagram business permissions the
    /// publishing features rely on.
    pub fn default_scopes(&self) -> &'static [&'static str] {
        match self {
            OAuthProvider::Google => &["profile", "email"],
            OAuthProvider::Facebook => &[
                "public_profile",
                "email",
                "instagram_basic",
                "instagram_content_publish",
                "pages_show_list",
                "pages_read_engagement",
                "instagram_manage_insights",
            ],
            OAuthProvider::Apple => &["email", "name"],
        }
    }

    pub fn uses_pkce(&self) -> bool {
        matches!(self, OAuthProvider::Google)
    }

    /// Extra authorization parameters. Google needs an explicit consent
    /// prompt to hand the backend a refresh token.
    pub fn extra_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            OAuthProvider::Google => &[("access_type", "offline"), ("prompt", "consent")],
            OAuthProvider::Facebook | OAuthProvider::Apple => &[],
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "facebook" => Ok(OAuthProvider::Facebook),
            "apple" => Ok(OAuthProvider::Apple),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!("google".parse::<OAuthProvider>(), Ok(OAuthProvider::Google));
        assert_eq!("Apple".parse::<OAuthProvider>(), Ok(OAuthProvider::Apple));
        assert_eq!(
            "twitter".parse::<OAuthProvider>(),
            Err("Unknown provider: twitter".to_string())
        );
    }

    #[test]
    fn test_only_google_uses_pkce() {
        let pkce: Vec<_> = OAuthProvider::ALL.iter().filter(|p| p.uses_pkce()).collect();
        assert_eq!(pkce, vec![&OAuthProvider::Google]);
    }
}
