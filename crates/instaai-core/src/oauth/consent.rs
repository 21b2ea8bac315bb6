//! One authorization attempt and the provider's answer to it.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use url::Url;

use super::pkce::{self, PkcePair, CHALLENGE_METHOD};
use super::settings::ProviderSettings;
use super::OAuthProvider;

/// Provider error codes that mean the user backed out rather than failed
const CANCEL_ERRORS: &[&str] = &[
    "access_denied",
    "user_cancelled_authorize",
    "user_cancelled_login",
];

/// State for a single sign-in attempt: the provider request that was built
/// and the secrets needed to redeem its code. Consumed by the exchange and
/// never persisted.
pub struct AuthorizationAttempt {
    provider: OAuthProvider,
    redirect_uri: String,
    scopes: Vec<String>,
    state: String,
    pkce: Option<PkcePair>,
    url: Url,
}

impl AuthorizationAttempt {
    pub(crate) fn new(
        provider: OAuthProvider,
        settings: &ProviderSettings,
        redirect_uri: &str,
    ) -> Result<Self, url::ParseError> {
        let state = pkce::generate_state();
        let pkce = provider.uses_pkce().then(PkcePair::generate);

        let mut url = Url::parse(provider.authorization_endpoint())?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &settings.client_id)
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &settings.scopes.join(" "))
                .append_pair("state", &state);
            if let Some(ref pkce) = pkce {
                query
                    .append_pair("code_challenge", &pkce.challenge)
                    .append_pair("code_challenge_method", CHALLENGE_METHOD);
            }
            for (key, value) in provider.extra_params() {
                query.append_pair(key, value);
            }
        }

        Ok(Self {
            provider,
            redirect_uri: redirect_uri.to_string(),
            scopes: settings.scopes.clone(),
            state,
            pkce,
            url,
        })
    }

    pub fn provider(&self) -> OAuthProvider {
        self.provider
    }

    /// Where to send the user for consent
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub(crate) fn code_verifier(&self) -> Option<&str> {
        self.pkce.as_ref().map(|p| p.verifier.as_str())
    }
}

impl fmt::Debug for AuthorizationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationAttempt")
            .field("provider", &self.provider)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("pkce", &self.pkce.is_some())
            .finish_non_exhaustive()
    }
}

/// How the provider's consent step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentOutcome {
    Success {
        code: String,
        /// `state` echoed back by the provider
        state: Option<String>,
        /// Identity token some providers (Apple) return next to the code
        id_token: Option<String>,
    },
    Cancelled,
    Error {
        message: String,
    },
}

impl ConsentOutcome {
    /// Read the outcome from the URL the provider redirected to.
    /// Parameters may arrive in the query or in the fragment.
    pub fn from_redirect_url(redirect: &str) -> Self {
        let url = match Url::parse(redirect.trim()) {
            Ok(url) => url,
            Err(e) => {
                return ConsentOutcome::Error {
                    message: format!("Invalid redirect URL: {}", e),
                }
            }
        };

        let mut params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        if let Some(fragment) = url.fragment() {
            params.extend(url::form_urlencoded::parse(fragment.as_bytes()).into_owned());
        }

        if let Some(error) = params.get("error") {
            if CANCEL_ERRORS.contains(&error.as_str()) {
                return ConsentOutcome::Cancelled;
            }
            let message = params
                .get("error_description")
                .cloned()
                .unwrap_or_else(|| error.clone());
            return ConsentOutcome::Error { message };
        }

        match params.remove("code").filter(|code| !code.is_empty()) {
            Some(code) => ConsentOutcome::Success {
                code,
                state: params.remove("state"),
                id_token: params.remove("id_token"),
            },
            None => ConsentOutcome::Error {
                message: "Redirect did not include an authorization code".to_string(),
            },
        }
    }
}

/// Shows the provider's consent page and reports how it ended.
///
/// Implemented by the front end: a webview, the system browser with a
/// deep-link listener, or a terminal that asks for the redirect URL.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    async fn request_consent(&self, attempt: &AuthorizationAttempt) -> ConsentOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: OAuthProvider) -> ProviderSettings {
        ProviderSettings {
            client_id: "client-123".to_string(),
            scopes: provider.default_scopes().iter().map(|s| s.to_string()).collect(),
        }
    }

    fn query(attempt: &AuthorizationAttempt) -> HashMap<String, String> {
        attempt.url().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_google_attempt_url() {
        let attempt = AuthorizationAttempt::new(
            OAuthProvider::Google,
            &settings(OAuthProvider::Google),
            "instaai://auth/callback",
        )
        .unwrap();
        let q = query(&attempt);

        assert!(attempt.url().as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert_eq!(q["client_id"], "client-123");
        assert_eq!(q["redirect_uri"], "instaai://auth/callback");
        assert_eq!(q["response_type"], "code");
        assert_eq!(q["scope"], "profile email");
        assert_eq!(q["state"], attempt.state());
        assert_eq!(q["code_challenge_method"], "S256");
        assert_eq!(q["access_type"], "offline");
        assert_eq!(q["prompt"], "consent");

        let verifier = attempt.code_verifier().expect("google uses pkce");
        assert_eq!(q["code_challenge"], pkce::code_challenge(verifier));
    }

    #[test]
    fn test_attempts_never_share_secrets() {
        let s = settings(OAuthProvider::Google);
        let a = AuthorizationAttempt::new(OAuthProvider::Google, &s, "x://cb").unwrap();
        let b = AuthorizationAttempt::new(OAuthProvider::Google, &s, "x://cb").unwrap();
        assert_ne!(a.code_verifier(), b.code_verifier());
        assert_ne!(a.state(), b.state());
    }

    #[test]
    fn test_facebook_and_apple_skip_pkce() {
        for provider in [OAuthProvider::Facebook, OAuthProvider::Apple] {
            let attempt =
                AuthorizationAttempt::new(provider, &settings(provider), "x://cb").unwrap();
            let q = query(&attempt);
            assert!(attempt.code_verifier().is_none());
            assert!(!q.contains_key("code_challenge"));
            assert!(!q.contains_key("prompt"));
        }
    }

    #[test]
    fn test_debug_hides_secrets() {
        let attempt = AuthorizationAttempt::new(
            OAuthProvider::Google,
            &settings(OAuthProvider::Google),
            "x://cb",
        )
        .unwrap();
        let debug = format!("{:?}", attempt);
        assert!(!debug.contains(attempt.code_verifier().unwrap()));
        assert!(!debug.contains(attempt.state()));
    }

    #[test]
    fn test_redirect_success() {
        let outcome =
            ConsentOutcome::from_redirect_url("instaai://auth/callback?code=abc&state=xyz");
        assert_eq!(
            outcome,
            ConsentOutcome::Success {
                code: "abc".to_string(),
                state: Some("xyz".to_string()),
                id_token: None,
            }
        );
    }

    #[test]
    fn test_redirect_fragment_with_id_token() {
        let outcome = ConsentOutcome::from_redirect_url(
            "https://app.example/auth/callback#code=c1&state=s1&id_token=eyJ",
        );
        assert!(matches!(
            outcome,
            ConsentOutcome::Success { ref code, ref id_token, .. }
                if code == "c1" && id_token.as_deref() == Some("eyJ")
        ));
    }

    #[test]
    fn test_redirect_cancelled() {
        assert_eq!(
            ConsentOutcome::from_redirect_url(
                "instaai://auth/callback?error=access_denied&error_reason=user_denied"
            ),
            ConsentOutcome::Cancelled
        );
        assert_eq!(
            ConsentOutcome::from_redirect_url("instaai://auth/callback?error=user_cancelled_authorize"),
            ConsentOutcome::Cancelled
        );
    }

    #[test]
    fn test_redirect_errors() {
        assert_eq!(
            ConsentOutcome::from_redirect_url(
                "instaai://auth/callback?error=invalid_scope&error_description=Bad+scope"
            ),
            ConsentOutcome::Error {
                message: "Bad scope".to_string()
            }
        );
        assert!(matches!(
            ConsentOutcome::from_redirect_url("instaai://auth/callback?state=s"),
            ConsentOutcome::Error { .. }
        ));
        assert!(matches!(
            ConsentOutcome::from_redirect_url("not a url"),
            ConsentOutcome::Error { .. }
        ));
    }
}
