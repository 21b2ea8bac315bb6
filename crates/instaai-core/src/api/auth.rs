//! Account operations: register, login, current user, logout.
//!
//! Register and login persist the returned session before they return, so
//! the next request made through the same client is already authenticated.

use serde::Serialize;
use tracing::info;

use super::{endpoints, ApiClient, ApiError};
use crate::models::{AuthResponse, User};

/// Minimum password length accepted at registration
const MIN_PASSWORD_LENGTH: usize = 8;

/// Sign-up form input, validated before anything is sent.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
}

impl RegisterRequest {
    /// Confirmation defaults to the password itself
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            confirm_password: password.clone(),
            password,
            full_name: full_name.into(),
        }
    }

    pub fn with_confirmation(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() || self.full_name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
}

impl ApiClient {
    /// Create an account and sign in as it
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        request.validate()?;

        let body = RegisterBody {
            email: request.email.trim(),
            password: &request.password,
            full_name: request.full_name.trim(),
        };
        let auth: AuthResponse = self.post(endpoints::REGISTER, &body).await?;

        self.store().save(&auth.access_token, &auth.user)?;
        info!(user_id = auth.user.id, "Registered new account");
        Ok(auth)
    }

    /// Sign in with email and password.
    /// The backend expects an OAuth2 password form, with the email as `username`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter your email and password".to_string(),
            ));
        }

        let form = [("username", email), ("password", password)];
        let auth: AuthResponse = self.post_form(endpoints::LOGIN, &form).await?;

        self.store().save(&auth.access_token, &auth.user)?;
        info!(user_id = auth.user.id, "Logged in");
        Ok(auth)
    }

    /// Fetch the signed-in user from the backend
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get(endpoints::ME).await
    }

    /// Fetch the signed-in user and replace the cached profile with it
    pub async fn refresh_profile(&self) -> Result<User, ApiError> {
        let user = self.me().await?;
        // A 401 would have failed above; no token here means a concurrent logout
        if let Some(token) = self.store().token() {
            self.store().save(&token, &user)?;
        }
        Ok(user)
    }

    /// Forget the session. Safe to call when already signed out.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Adopt a token obtained elsewhere (e.g. an OAuth sign-in)
    pub fn set_token(&self, token: &str) -> Result<(), ApiError> {
        self.store().set_token(token)?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store().is_authenticated()
    }

    /// The profile saved at the last sign-in, without a network call
    pub fn stored_user(&self) -> Option<User> {
        self.store().profile()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::tests::test_client;
    use crate::storage::CredentialStore;

    fn auth_body(token: &str) -> serde_json::Value {
        json!({
            "access_token": token,
            "token_type": "bearer",
            "user": {"id": 1, "email": "a@b.com", "subscription_tier": "free", "created_at": "2024-01-01"}
        })
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest::new("a@b.com", "secret123", "Ada");
        assert!(ok.validate().is_ok());

        let missing = RegisterRequest::new("a@b.com", "secret123", " ");
        assert_eq!(
            missing.validate().unwrap_err().to_string(),
            "Please fill in all required fields"
        );

        let mismatch = RegisterRequest::new("a@b.com", "secret123", "Ada").with_confirmation("secret124");
        assert_eq!(mismatch.validate().unwrap_err().to_string(), "Passwords do not match");

        let short = RegisterRequest::new("a@b.com", "short", "Ada");
        assert_eq!(
            short.validate().unwrap_err().to_string(),
            "Password must be at least 8 characters long"
        );

        let bad_email = RegisterRequest::new("not-an-email", "secret123", "Ada");
        assert!(matches!(bad_email.validate(), Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("username=a%40b.com"))
            .and(body_string_contains("password=secret123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok1")))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(CredentialStore::in_memory());
        let api = test_client(&server, store.clone());

        let auth = api.login("a@b.com", "secret123").await.unwrap();
        assert_eq!(auth.access_token, "tok1");
        assert_eq!(store.token().as_deref(), Some("tok1"));
        assert_eq!(store.profile().map(|u| u.email), Some("a@b.com".to_string()));
    }

    #[tokio::test]
    async fn test_register_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({"email": "a@b.com", "password": "secret123", "full_name": "Ada"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok-new")))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(CredentialStore::in_memory());
        let api = test_client(&server, store.clone());

        let auth = api
            .register(&RegisterRequest::new("a@b.com", "secret123", "Ada"))
            .await
            .unwrap();
        assert_eq!(store.token(), Some(auth.access_token.clone()));
        assert_eq!(store.profile(), Some(auth.user));
    }

    #[tokio::test]
    async fn test_register_rejected_by_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})))
            .mount(&server)
            .await;

        let store = Arc::new(CredentialStore::in_memory());
        let api = test_client(&server, store.clone());

        let err = api
            .register(&RegisterRequest::new("a@b.com", "secret123", "Ada"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref d) if d == "Email already registered"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_validation_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok1")))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(CredentialStore::in_memory());
        let api = test_client(&server, store.clone());

        let mismatch = RegisterRequest::new("a@b.com", "secret123", "Ada").with_confirmation("nope");
        assert!(matches!(api.register(&mismatch).await, Err(ApiError::Validation(_))));
        assert!(matches!(api.login("", "secret123").await, Err(ApiError::Validation(_))));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_next_request_after_login_is_authenticated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok1")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer tok1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok1")["user"].clone()))
            .expect(1)
            .mount(&server)
            .await;

        let api = test_client(&server, Arc::new(CredentialStore::in_memory()));
        api.login("a@b.com", "secret123").await.unwrap();
        let me = api.me().await.unwrap();
        assert_eq!(me.id, 1);
    }

    #[tokio::test]
    async fn test_logout_after_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok1")))
            .mount(&server)
            .await;

        let api = test_client(&server, Arc::new(CredentialStore::in_memory()));
        api.login("a@b.com", "secret123").await.unwrap();
        assert!(api.is_authenticated());

        api.logout().await.unwrap();
        assert!(!api.is_authenticated());
        assert_eq!(api.stored_user(), None);

        // Second logout is harmless
        assert!(api.logout().await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_profile_updates_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "email": "a@b.com", "full_name": "Ada", "subscription_tier": "pro", "created_at": "2024-01-01"
            })))
            .mount(&server)
            .await;

        let store = Arc::new(CredentialStore::in_memory());
        store.set_token("oauth-token").unwrap();
        let api = test_client(&server, store.clone());

        let user = api.refresh_profile().await.unwrap();
        assert_eq!(user.subscription_tier, "pro");
        assert_eq!(store.profile(), Some(user));
        assert_eq!(store.token().as_deref(), Some("oauth-token"));
    }
}
