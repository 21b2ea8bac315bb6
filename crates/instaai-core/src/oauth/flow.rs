//! Sign-in with an external provider, redeemed through the backend.
//!
//! An attempt moves through Idle, AwaitingProviderConsent, ExchangingCode and
//! Completed. The provider's code is exchanged by the backend's callback
//! endpoint, never the provider's token endpoint, so provider secrets stay
//! server-side.

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::consent::{AuthorizationAttempt, ConsentOutcome, ConsentPrompt};
use super::{OAuthProvider, OAuthSettings};
use crate::api::{endpoints, ApiClient, ApiError};

/// Failure message for a consent step the user closed
pub const CANCELLED_MESSAGE: &str = "Authentication cancelled";

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("{0} sign-in is not configured for this platform")]
    NotConfigured(&'static str),

    #[error("Invalid authorization endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Authorization response did not match this sign-in attempt")]
    StateMismatch,

    #[error("Sign-in response did not include a session token")]
    MissingToken,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowState {
    Idle,
    AwaitingProviderConsent,
    ExchangingCode,
    Completed,
}

fn transition(provider: OAuthProvider, from: FlowState, to: FlowState) {
    debug!(provider = %provider, ?from, ?to, "OAuth state change");
}

/// Minimal profile returned by the backend after a provider sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "full_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}

/// Outcome of a provider sign-in, as reported to the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthResult {
    pub success: bool,
    pub provider: OAuthProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OAuthUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    cancelled: bool,
}

impl OAuthResult {
    fn failure(provider: OAuthProvider, message: impl Into<String>) -> Self {
        Self {
            success: false,
            provider,
            access_token: None,
            refresh_token: None,
            id_token: None,
            user: None,
            error: Some(message.into()),
            cancelled: false,
        }
    }

    fn cancelled(provider: OAuthProvider) -> Self {
        Self {
            cancelled: true,
            ..Self::failure(provider, CANCELLED_MESSAGE)
        }
    }

    /// The user closed the consent step; not an error worth reporting
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Body for `/auth/{provider}/callback`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRequest<'a> {
    code: &'a str,
    redirect_uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token: Option<&'a str>,
}

#[derive(Deserialize)]
struct ExchangeResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    user: Option<OAuthUser>,
}

/// Drives provider sign-in attempts and stores the resulting session.
#[derive(Clone)]
pub struct OAuthFlow {
    api: ApiClient,
    settings: OAuthSettings,
}

impl OAuthFlow {
    pub fn new(api: ApiClient, settings: OAuthSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    /// Build a fresh authorization request for `provider`
    pub fn begin(&self, provider: OAuthProvider) -> Result<AuthorizationAttempt, OAuthError> {
        let provider_settings = self
            .settings
            .provider(provider)
            .ok_or(OAuthError::NotConfigured(provider.display_name()))?;
        let attempt =
            AuthorizationAttempt::new(provider, provider_settings, self.settings.redirect_uri())?;
        Ok(attempt)
    }

    /// Run one complete sign-in. Never fails outright: every ending is
    /// reported in the returned `OAuthResult`.
    ///
    /// Callers should disable re-entry while this is pending; concurrent
    /// attempts are independent and the last stored token wins.
    pub async fn sign_in(&self, provider: OAuthProvider, prompt: &dyn ConsentPrompt) -> OAuthResult {
        let attempt = match self.begin(provider) {
            Ok(attempt) => attempt,
            Err(e) => {
                warn!(provider = %provider, error = %e, "Could not start sign-in");
                return OAuthResult::failure(provider, e.to_string());
            }
        };

        transition(provider, FlowState::Idle, FlowState::AwaitingProviderConsent);
        let outcome = prompt.request_consent(&attempt).await;
        self.complete(attempt, outcome).await
    }

    /// Finish an attempt with the provider's outcome. The attempt is
    /// consumed, so its code and verifier can only be redeemed once.
    pub async fn complete(&self, attempt: AuthorizationAttempt, outcome: ConsentOutcome) -> OAuthResult {
        let provider = attempt.provider();
        let mut phase = FlowState::AwaitingProviderConsent;

        let result = match outcome {
            ConsentOutcome::Cancelled => {
                info!(provider = %provider, "Sign-in cancelled by user");
                OAuthResult::cancelled(provider)
            }
            ConsentOutcome::Error { message } => {
                warn!(provider = %provider, %message, "Provider returned an error");
                OAuthResult::failure(provider, message)
            }
            ConsentOutcome::Success {
                code,
                state,
                id_token,
            } => {
                transition(provider, phase, FlowState::ExchangingCode);
                phase = FlowState::ExchangingCode;
                match self.exchange(attempt, &code, state.as_deref(), id_token).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(provider = %provider, error = %e, "Code exchange failed");
                        OAuthResult::failure(provider, e.to_string())
                    }
                }
            }
        };

        transition(provider, phase, FlowState::Completed);
        result
    }

    async fn exchange(
        &self,
        attempt: AuthorizationAttempt,
        code: &str,
        state: Option<&str>,
        id_token: Option<String>,
    ) -> Result<OAuthResult, OAuthError> {
        if state != Some(attempt.state()) {
            return Err(OAuthError::StateMismatch);
        }

        let provider = attempt.provider();
        let body = ExchangeRequest {
            code,
            redirect_uri: attempt.redirect_uri(),
            code_verifier: attempt.code_verifier(),
            id_token: id_token.as_deref(),
        };
        let response: ExchangeResponse = self
            .api
            .post(&endpoints::oauth_callback(provider.as_str()), &body)
            .await?;

        let token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingToken)?;

        // Persist before reporting success so the caller's next request is
        // authenticated. Any cached profile belongs to the previous session.
        self.api
            .store()
            .replace_session(&token)
            .map_err(ApiError::from)?;
        info!(provider = %provider, "Signed in with provider");

        Ok(OAuthResult {
            success: true,
            provider,
            access_token: Some(token),
            refresh_token: response.refresh_token,
            id_token: response.id_token.or(id_token),
            user: response.user,
            error: None,
            cancelled: false,
        })
    }
}
