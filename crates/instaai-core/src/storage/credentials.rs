use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use tracing::{debug, warn};

use super::{KeyValueStore, MemoryStore, StorageError};
use crate::models::User;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "@instaai_token";

/// Storage key for the cached user profile (JSON)
pub const USER_KEY: &str = "@instaai_user";

/// Storage key for the first-run onboarding flag
pub const ONBOARDING_KEY: &str = "hasSeenOnboarding";

/// What the memory layer knows about the durable token.
#[derive(Debug, Clone)]
enum CachedToken {
    /// Not read from storage yet (or the last read failed)
    Unloaded,
    Absent,
    Present(String),
}

/// Whether the first-run onboarding has been completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStatus {
    NotSeen,
    Seen,
    /// The flag could not be read
    Unavailable,
}

/// Session token and cached profile.
///
/// The token is cached in memory in front of the durable backend. Every write
/// goes to the backend first; the memory layer only changes after the durable
/// write succeeded, so memory never claims a session that storage lost.
pub struct CredentialStore {
    backend: Box<dyn KeyValueStore>,
    token: RwLock<CachedToken>,
}

impl CredentialStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            token: RwLock::new(CachedToken::Unloaded),
        }
    }

    /// Store without persistence, for tests and throwaway sessions
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn cache(&self) -> RwLockWriteGuard<'_, CachedToken> {
        self.token.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Save a new session. Both records are written or the call fails.
    pub fn save(&self, token: &str, profile: &User) -> Result<(), StorageError> {
        let profile_json = serde_json::to_string(profile)?;

        self.backend.set(TOKEN_KEY, token)?;
        if let Err(e) = self.backend.set(USER_KEY, &profile_json) {
            // The profile on disk may belong to the session being replaced
            let rolled_back = self
                .backend
                .remove(TOKEN_KEY)
                .and_then(|()| self.backend.remove(USER_KEY));
            *self.cache() = match rolled_back {
                Ok(()) => CachedToken::Absent,
                Err(rollback) => {
                    warn!(error = %rollback, "Failed to roll back session after profile write failure");
                    CachedToken::Unloaded
                }
            };
            return Err(e);
        }

        *self.cache() = CachedToken::Present(token.to_string());
        debug!(user_id = profile.id, "Session saved");
        Ok(())
    }

    /// Replace the token only; the cached profile is left as is.
    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.backend.set(TOKEN_KEY, token)?;
        *self.cache() = CachedToken::Present(token.to_string());
        debug!("Session token replaced");
        Ok(())
    }

    /// Start a session known only by its token. The cached profile is
    /// dropped first since it describes whoever was signed in before.
    pub fn replace_session(&self, token: &str) -> Result<(), StorageError> {
        self.backend.remove(USER_KEY)?;
        self.set_token(token)
    }

    /// Current bearer token. Storage read failures count as signed out.
    pub fn token(&self) -> Option<String> {
        {
            let cached = self.token.read().unwrap_or_else(PoisonError::into_inner);
            match &*cached {
                CachedToken::Present(token) => return Some(token.clone()),
                CachedToken::Absent => return None,
                CachedToken::Unloaded => {}
            }
        }

        // Load under the write lock so a concurrent clear() or save() cannot
        // land between the durable read and the cache update.
        let mut cached = self.cache();
        match &*cached {
            CachedToken::Present(token) => return Some(token.clone()),
            CachedToken::Absent => return None,
            CachedToken::Unloaded => {}
        }

        match self.backend.get(TOKEN_KEY) {
            Ok(Some(token)) => {
                *cached = CachedToken::Present(token.clone());
                Some(token)
            }
            Ok(None) => {
                *cached = CachedToken::Absent;
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read session token, treating as signed out");
                None
            }
        }
    }

    /// Cached user profile. Missing, unreadable or corrupt data is `None`.
    pub fn profile(&self) -> Option<User> {
        let json = match self.backend.get(USER_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read cached profile");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Cached profile is corrupt, ignoring");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Remove the token and profile. Safe to call when nothing is stored.
    ///
    /// The memory layer is cleared even if a durable remove fails, so this
    /// process stops sending the token either way.
    pub fn clear(&self) -> Result<(), StorageError> {
        *self.cache() = CachedToken::Absent;
        let token = self.backend.remove(TOKEN_KEY);
        let profile = self.backend.remove(USER_KEY);
        debug!("Session cleared");
        token.and(profile)
    }

    // ===== Onboarding =====

    pub fn onboarding_status(&self) -> OnboardingStatus {
        match self.backend.get(ONBOARDING_KEY) {
            Ok(Some(value)) if value == "true" => OnboardingStatus::Seen,
            Ok(_) => OnboardingStatus::NotSeen,
            Err(e) => {
                warn!(error = %e, "Failed to read onboarding flag");
                OnboardingStatus::Unavailable
            }
        }
    }

    pub fn mark_onboarding_seen(&self) -> Result<(), StorageError> {
        self.backend.set(ONBOARDING_KEY, "true")
    }

    pub fn reset_onboarding(&self) -> Result<(), StorageError> {
        self.backend.remove(ONBOARDING_KEY)
    }
}
