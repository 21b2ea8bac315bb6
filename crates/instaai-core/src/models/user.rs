use serde::{Deserialize, Serialize};

/// The signed-in account, as returned by `/auth/me` and the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub subscription_tier: String,
    /// Backend timestamp, kept verbatim
    pub created_at: String,
}

impl User {
    /// Full name when set, otherwise the email address
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}
