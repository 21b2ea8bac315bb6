//! Credential persistence.
//!
//! This module provides:
//! - `KeyValueStore`: the durable storage seam, with file, OS keychain and
//!   in-memory implementations
//! - `CredentialStore`: the session token and cached user profile, fronted by
//!   an in-memory token cache, plus the first-run onboarding flag
//!
//! Keys are stable across releases so an upgrade never signs the user out.

pub mod backend;
pub mod credentials;
pub mod error;

pub use backend::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
pub use credentials::{CredentialStore, OnboardingStatus, ONBOARDING_KEY, TOKEN_KEY, USER_KEY};
pub use error::StorageError;
