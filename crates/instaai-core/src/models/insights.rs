//! Analytics snapshots and AI recommendations for a linked account.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdFormat {
    Reels,
    Image,
    Video,
    CarouselAlbum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdFormatRecommendation {
    pub format: AdFormat,
    pub score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingRecommendation {
    pub age_ranges: Vec<String>,
    pub genders: Vec<String>,
    pub locations: Vec<String>,
    pub interests: Vec<String>,
    pub lookalike: bool,
    pub reasoning: String,
}

/// Budget split between channels, as fractions or amounts depending on the goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    #[serde(default)]
    pub instagram: f64,
    #[serde(default)]
    pub facebook: f64,
    #[serde(default)]
    pub google: Option<f64>,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingSchedule {
    pub best_days: Vec<String>,
    pub best_times: Vec<String>,
    pub frequency: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStrategy {
    pub tone: String,
    pub topics: Vec<String>,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiProjection {
    pub estimated_reach: f64,
    pub estimated_clicks: f64,
    pub estimated_conversions: f64,
    pub estimated_revenue: f64,
    pub confidence: String,
    pub assumptions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRecommendations {
    pub summary: String,
    #[serde(default)]
    pub ad_formats: Vec<AdFormatRecommendation>,
    #[serde(default)]
    pub targeting: TargetingRecommendation,
    #[serde(default)]
    pub budget_allocation: BudgetAllocation,
    #[serde(default)]
    pub posting_schedule: PostingSchedule,
    #[serde(default)]
    pub content_strategy: ContentStrategy,
    #[serde(default)]
    pub roi_projection: RoiProjection,
    pub generated_at: String,
}

impl AiRecommendations {
    /// Highest-scoring ad format, if any were recommended
    pub fn top_ad_format(&self) -> Option<&AdFormatRecommendation> {
        self.ad_formats
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsResponse {
    /// Raw Instagram insights; the shape varies by account type
    #[serde(default)]
    pub account_insights: serde_json::Value,
    pub ai_recommendations: AiRecommendations,
    pub cached_at: String,
    pub expires_at: String,
}

/// Business goal sent to `/insights/:id/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisGoal {
    #[serde(rename = "type")]
    pub goal_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl AnalysisGoal {
    pub fn new(goal_type: impl Into<String>) -> Self {
        Self {
            goal_type: goal_type.into(),
            product_name: None,
            product_price: None,
            target_audience: None,
            budget: None,
        }
    }

    pub fn with_product(mut self, name: impl Into<String>, price: Option<f64>) -> Self {
        self.product_name = Some(name.into());
        self.product_price = price;
        self
    }

    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = Some(audience.into());
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insights_response() {
        let json = r#"{
            "account_insights": {"impressions": 1200},
            "ai_recommendations": {
                "summary": "Post more reels",
                "ad_formats": [
                    {"format": "IMAGE", "score": 0.4, "reasoning": "ok"},
                    {"format": "CAROUSEL_ALBUM", "score": 0.9, "reasoning": "best"}
                ],
                "budget_allocation": {"instagram": 0.7, "facebook": 0.3, "reasoning": "audience"},
                "generated_at": "2024-06-01T08:00:00"
            },
            "cached_at": "2024-06-01T08:00:00",
            "expires_at": "2024-06-02T08:00:00"
        }"#;

        let insights: InsightsResponse = serde_json::from_str(json).expect("insights");
        let recs = &insights.ai_recommendations;
        assert_eq!(recs.top_ad_format().map(|f| f.format), Some(AdFormat::CarouselAlbum));
        assert_eq!(recs.budget_allocation.google, None);
        assert!(recs.targeting.age_ranges.is_empty());
        assert_eq!(insights.account_insights["impressions"], 1200);
    }

    #[test]
    fn test_analysis_goal_omits_unset_fields() {
        let goal = AnalysisGoal::new("sales").with_budget(500.0);
        let value = serde_json::to_value(&goal).unwrap();

        assert_eq!(value, serde_json::json!({"type": "sales", "budget": 500.0}));
    }
}
