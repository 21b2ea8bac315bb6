use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post queued for publishing. Fields the client does not model are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: i64,
    #[serde(default)]
    pub content_id: Option<i64>,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body for `POST /schedule`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScheduledPost {
    pub content_id: i64,
    pub account_id: i64,
    pub scheduled_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl NewScheduledPost {
    pub fn new(content_id: i64, account_id: i64, scheduled_time: DateTime<Utc>) -> Self {
        Self {
            content_id,
            account_id,
            scheduled_time,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_scheduled_post_body() {
        let when = Utc.with_ymd_and_hms(2024, 7, 4, 18, 30, 0).unwrap();
        let body = serde_json::to_value(NewScheduledPost::new(3, 9, when)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "content_id": 3,
                "account_id": 9,
                "scheduled_time": "2024-07-04T18:30:00Z"
            })
        );
    }

    #[test]
    fn test_scheduled_post_keeps_unknown_fields() {
        let json = r#"{"id": 5, "content_id": 3, "status": "scheduled", "media_url": "https://cdn/x.jpg"}"#;
        let post: ScheduledPost = serde_json::from_str(json).unwrap();

        assert_eq!(post.status.as_deref(), Some("scheduled"));
        assert_eq!(post.extra.get("media_url").and_then(|v| v.as_str()), Some("https://cdn/x.jpg"));
    }
}
