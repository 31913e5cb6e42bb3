use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{AnalysisResponse, CheckInRequest, HistoryQuery};
use crate::error::{AppError, AppResult};
use crate::handlers::progress::sync_streak;
use crate::models::check_in::{CheckIn, NewCheckIn};
use crate::AppState;

/// Analyse the questionnaire, then store the check-in with its analysis.
/// A storage failure is returned to the client; the check-in is not saved.
pub async fn create_check_in(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CheckInRequest>,
) -> AppResult<Json<CheckIn>> {
    body.validate()?;

    let questionnaire = body.questionnaire();
    let outcome = state
        .analysis
        .fetch_analysis(&questionnaire, body.foto_status)
        .await;

    let new = NewCheckIn {
        id: Uuid::new_v4(),
        user_id: auth_user.id,
        date: Utc::now(),
        questionnaire,
        foto_status: body.foto_status,
        analysis: outcome.analysis,
        analysis_source: outcome.source,
    };

    let check_in = db::check_ins::insert(&state.db, new).await?;
    tracing::info!(
        user_id = %auth_user.id,
        check_in_id = %check_in.id,
        humor = %check_in.humor,
        "Check-in saved"
    );

    // The cached streak is repaired on the next read if this fails.
    if let Err(e) = sync_streak(&state, auth_user.id).await {
        tracing::warn!(user_id = %auth_user.id, error = %e, "Streak refresh after check-in failed");
    }

    Ok(Json(check_in))
}

pub async fn list_check_ins(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<CheckIn>>> {
    query.validate()?;
    if let (Some(start), Some(end)) = (query.start, query.end) {
        if start > end {
            return Err(AppError::Validation("start must not be after end".into()));
        }
    }

    let check_ins = db::check_ins::list(&state.db, auth_user.id, &query.into()).await?;
    Ok(Json(check_ins))
}

/// Run the analysis without persisting anything.
pub async fn preview_analysis(
    State(state): State<AppState>,
    Json(body): Json<CheckInRequest>,
) -> AppResult<Json<AnalysisResponse>> {
    body.validate()?;

    let outcome = state
        .analysis
        .fetch_analysis(&body.questionnaire(), body.foto_status)
        .await;

    Ok(Json(outcome.into()))
}
