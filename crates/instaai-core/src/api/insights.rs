use super::{endpoints, ApiClient, ApiError};
use crate::models::{AnalysisGoal, InsightsResponse};

impl ApiClient {
    /// Analytics snapshot for a linked account. The backend serves a cached
    /// snapshot unless `force_refresh` is set.
    pub async fn insights(
        &self,
        account_id: i64,
        force_refresh: bool,
    ) -> Result<InsightsResponse, ApiError> {
        self.get_with_query(
            &endpoints::insights(account_id),
            &[("force_refresh", force_refresh)],
        )
        .await
    }

    /// Goal-driven recommendations; the result shape depends on the goal
    pub async fn analyze_with_goal(
        &self,
        account_id: i64,
        goal: &AnalysisGoal,
    ) -> Result<serde_json::Value, ApiError> {
        self.post(&endpoints::analyze_with_goal(account_id), goal).await
    }
}
