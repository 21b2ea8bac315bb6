use serde::{Deserialize, Serialize};

/// An Instagram business account linked to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct InstagramAccount {
    pub id: i64,
    pub instagram_user_id: String,
    pub username: String,
    pub account_type: String,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_synced_at: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl InstagramAccount {
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

/// Where to send the user to authorize Instagram access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramAuthUrl {
    pub authorization_url: String,
    #[serde(default)]
    pub state: Option<String>,
}
