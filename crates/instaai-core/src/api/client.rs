//! API client for communicating with the InstaAI REST API.
//!
//! Every backend call goes through `ApiClient::send`, which attaches the
//! stored bearer token and reacts to 401 responses by clearing the session.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::config::ApiConfig;
use crate::storage::CredentialStore;

/// API client for the InstaAI backend.
/// Clone is cheap - the connection pool and the credential store are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<CredentialStore>,
}

impl ApiClient {
    /// Create a new API client bound to a credential store
    pub fn new(config: &ApiConfig, store: Arc<CredentialStore>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_http_client(client, &config.base_url, store))
    }

    /// Use a prebuilt HTTP client (connection pool reuse or testing)
    pub fn with_http_client(
        client: Client,
        base_url: impl Into<String>,
        store: Arc<CredentialStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Attach the bearer token when one is stored and dispatch.
    /// Without a token the request goes out unauthenticated.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.store.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "Sending request");
        let response = self.client.execute(request).await?;
        self.check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    /// A 401 clears the stored session before the error is returned.
    async fn check_response(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Backend rejected credentials, clearing session");
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to remove stored credentials");
            }
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    // ===== Request helpers =====

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Self::parse_json(response, path).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        Self::parse_json(response, path).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::parse_json(response, path).await
    }

    pub(crate) async fn post_form<T, F>(&self, path: &str, form: &F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::POST, path).form(form)).await?;
        Self::parse_json(response, path).await
    }

    /// PATCH without a body; the response body is ignored
    pub(crate) async fn patch(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::PATCH, path)).await?;
        Ok(())
    }

    /// DELETE; the response body is ignored
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
