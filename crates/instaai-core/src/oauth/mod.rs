//! Sign-in with Google, Facebook and Apple.
//!
//! This module provides:
//! - `OAuthProvider`, `Platform`: provider catalogue and target platforms
//! - `OAuthSettings`: client ids and redirect target resolved once per run
//! - `ConsentPrompt`, `ConsentOutcome`: the front-end seam for the provider page
//! - `OAuthFlow`: builds each attempt (with PKCE where supported), redeems the
//!   code through the backend and stores the session token

pub mod consent;
pub mod flow;
pub mod pkce;
pub mod provider;
pub mod settings;

pub use consent::{AuthorizationAttempt, ConsentOutcome, ConsentPrompt};
pub use flow::{OAuthError, OAuthFlow, OAuthResult, OAuthUser, CANCELLED_MESSAGE};
pub use provider::OAuthProvider;
pub use settings::{ClientIdTable, OAuthSettings, Platform, ProviderSettings};
