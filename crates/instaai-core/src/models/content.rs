use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ContentStatus {
    Pending,
    Processing,
    Ready,
    Approved,
    Published,
    Failed,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Processing => "processing",
            ContentStatus::Ready => "ready",
            ContentStatus::Approved => "approved",
            ContentStatus::Published => "published",
            ContentStatus::Failed => "failed",
        }
    }

    /// Parse a status filter, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ContentStatus::Pending),
            "processing" => Some(ContentStatus::Processing),
            "ready" => Some(ContentStatus::Ready),
            "approved" => Some(ContentStatus::Approved),
            "published" => Some(ContentStatus::Published),
            "failed" => Some(ContentStatus::Failed),
            _ => None,
        }
    }

    /// Content the user can still approve
    pub fn is_reviewable(&self) -> bool {
        matches!(self, ContentStatus::Ready)
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated post in the content library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GeneratedContent {
    pub id: i64,
    pub content_type: String,
    #[serde(default)]
    pub title: Option<String>,
    pub status: ContentStatus,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub suggested_caption: Option<String>,
    #[serde(default)]
    pub predicted_engagement_rate: Option<f64>,
    pub created_at: String,
}
