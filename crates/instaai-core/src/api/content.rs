use serde::Serialize;
use tracing::info;

use super::{endpoints, ApiClient, ApiError};
use crate::models::{ContentStatus, GeneratedContent};

#[derive(Serialize)]
struct GenerateBody {
    account_id: i64,
}

impl ApiClient {
    /// Content library, optionally filtered by status
    pub async fn content(
        &self,
        status: Option<ContentStatus>,
    ) -> Result<Vec<GeneratedContent>, ApiError> {
        match status {
            Some(status) => {
                self.get_with_query(endpoints::CONTENT, &[("status", status.as_str())])
                    .await
            }
            None => self.get(endpoints::CONTENT).await,
        }
    }

    /// Start generating a new post for an account
    pub async fn generate_content(&self, account_id: i64) -> Result<GeneratedContent, ApiError> {
        let content: GeneratedContent = self
            .post(endpoints::GENERATE_CONTENT, &GenerateBody { account_id })
            .await?;
        info!(content_id = content.id, account_id, "Content generation started");
        Ok(content)
    }

    pub async fn approve_content(&self, content_id: i64) -> Result<(), ApiError> {
        self.patch(&endpoints::approve_content(content_id)).await
    }

    pub async fn delete_content(&self, content_id: i64) -> Result<(), ApiError> {
        self.delete(&endpoints::content_item(content_id)).await
    }
}
