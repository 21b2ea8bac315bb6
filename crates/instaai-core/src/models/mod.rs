//! Data models for InstaAI backend records.
//!
//! This module contains the structures exchanged with the backend:
//!
//! - `User`, `AuthResponse`: account and session payloads
//! - `InstagramAccount`, `InstagramAuthUrl`: linked Instagram accounts
//! - `InsightsResponse`, `AiRecommendations`, `AnalysisGoal`: analytics
//! - `GeneratedContent`, `ContentStatus`: the content library
//! - `ScheduledPost`, `NewScheduledPost`: the posting schedule

pub mod content;
pub mod insights;
pub mod instagram;
pub mod schedule;
pub mod user;

pub use content::{ContentStatus, GeneratedContent};
pub use insights::{
    AdFormat, AdFormatRecommendation, AiRecommendations, AnalysisGoal, BudgetAllocation,
    ContentStrategy, InsightsResponse, PostingSchedule, RoiProjection, TargetingRecommendation,
};
pub use instagram::{InstagramAccount, InstagramAuthUrl};
pub use schedule::{NewScheduledPost, ScheduledPost};
pub use user::{AuthResponse, User};
