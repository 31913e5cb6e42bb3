//! # Eunoia — Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field validation is expressed via `validator` derive macros; vocabulary
//!   fields are rejected by serde when outside their label set

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::SessionToken;
use crate::models::analysis::{AiAnalysis, AnalysisSource};
use crate::models::check_in::{CheckIn, HistoryFilter, Questionnaire};
use crate::models::mood::{Energia, FotoStatus, Humor, Sono};
use crate::models::user::UserProfile;
use crate::services::analysis::AnalysisOutcome;
use crate::services::history::WeeklyAverage;

pub const DEFAULT_RECENT_LIMIT: i64 = 7;

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password required"))]
    pub password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub token: SessionToken,
    pub user: UserProfile,
}

// ============================================================================
// Check-ins
// ============================================================================

/// POST /api/check-ins and POST /api/analysis/preview
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub humor: Humor,
    pub energia: Energia,
    pub sono: Sono,

    #[validate(length(max = 2000, message = "Note must be under 2000 characters"))]
    pub justificativa: Option<String>,

    #[serde(default)]
    pub foto_status: FotoStatus,
}

impl CheckInRequest {
    pub fn questionnaire(&self) -> Questionnaire {
        Questionnaire {
            humor: self.humor,
            energia: self.energia,
            sono: self.sono,
            justificativa: self.justificativa.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: AiAnalysis,
    pub source: AnalysisSource,
}

impl From<AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            analysis: outcome.analysis,
            source: outcome.source,
        }
    }
}

/// GET /api/check-ins
#[derive(Debug, Deserialize, Validate)]
pub struct HistoryQuery {
    #[validate(range(min = 1, max = 365, message = "limit must be 1-365"))]
    pub limit: Option<i64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl From<HistoryQuery> for HistoryFilter {
    fn from(q: HistoryQuery) -> Self {
        Self {
            start: q.start,
            end: q.end,
            limit: q.limit,
        }
    }
}

// ============================================================================
// Progress
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_average: WeeklyAverage,
    pub recent: Vec<CheckIn>,
}

/// GET /api/progress
#[derive(Debug, Deserialize, Validate)]
pub struct ProgressQuery {
    #[validate(range(min = 1, max = 30, message = "recent must be 1-30"))]
    pub recent: Option<i64>,
}
