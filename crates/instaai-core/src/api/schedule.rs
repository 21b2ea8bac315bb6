use serde::Serialize;
use tracing::info;

use super::{endpoints, ApiClient, ApiError};
use crate::models::{NewScheduledPost, ScheduledPost};

#[derive(Serialize)]
struct ScheduleQuery<'a> {
    account_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

impl ApiClient {
    pub async fn scheduled_posts(
        &self,
        account_id: i64,
        status: Option<&str>,
    ) -> Result<Vec<ScheduledPost>, ApiError> {
        let query = ScheduleQuery { account_id, status };
        self.get_with_query(endpoints::SCHEDULE, &query).await
    }

    pub async fn schedule_post(&self, post: &NewScheduledPost) -> Result<ScheduledPost, ApiError> {
        let scheduled: ScheduledPost = self.post(endpoints::SCHEDULE, post).await?;
        info!(
            schedule_id = scheduled.id,
            content_id = post.content_id,
            at = %post.scheduled_time,
            "Post scheduled"
        );
        Ok(scheduled)
    }

    pub async fn cancel_scheduled_post(&self, schedule_id: i64) -> Result<(), ApiError> {
        self.delete(&endpoints::scheduled_post(schedule_id)).await
    }
}
