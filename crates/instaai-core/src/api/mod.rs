//! REST API client module for the InstaAI backend.
//!
//! This module provides the `ApiClient`, the single request pipeline used for
//! every backend call. It attaches the stored bearer token to each request and
//! clears the session when the backend answers 401.
//!
//! Operations are grouped by backend area: `auth`, `instagram`, `insights`,
//! `content` and `schedule`.

pub mod auth;
pub mod client;
pub mod content;
pub mod endpoints;
pub mod error;
pub mod insights;
pub mod instagram;
pub mod schedule;

pub use auth::RegisterRequest;
pub use client::ApiClient;
pub use error::ApiError;
