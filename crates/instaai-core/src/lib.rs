//! Core library for the InstaAI client.
//!
//! This crate provides:
//! - `CredentialStore`: session token and cached profile persistence
//! - `ApiClient`: the shared request pipeline for the InstaAI backend,
//!   including the auth, Instagram, insights, content and schedule operations
//! - `OAuthFlow`: Google, Facebook and Apple sign-in through the backend's
//!   code-exchange callbacks
//! - `Config`: on-disk configuration and environment overrides
//!
//! Front ends construct one `ApiClient` around an `Arc<CredentialStore>` and
//! pass it to whatever needs backend access.

pub mod api;
pub mod config;
pub mod models;
pub mod oauth;
pub mod storage;

pub use api::{ApiClient, ApiError, RegisterRequest};
pub use config::{ApiConfig, Config, Environment, StorageBackend};
pub use oauth::{
    ConsentOutcome, ConsentPrompt, OAuthFlow, OAuthProvider, OAuthResult, OAuthSettings, Platform,
};
pub use storage::{CredentialStore, OnboardingStatus, StorageError};
