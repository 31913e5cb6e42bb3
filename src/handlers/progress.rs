use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{ProgressQuery, ProgressResponse, StreakResponse, DEFAULT_RECENT_LIMIT};
use crate::error::{AppError, AppResult};
use crate::models::check_in::HistoryFilter;
use crate::services::history::{self, WeeklyAverage, WEEKLY_WINDOW_DAYS};
use crate::AppState;

/// Recompute streaks from history and repair the cached value on the user
/// record when it has drifted.
pub async fn sync_streak(state: &AppState, user_id: Uuid) -> AppResult<StreakResponse> {
    let user = db::users::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let days: Vec<_> = db::check_ins::timestamps(&state.db, user_id)
        .await?
        .into_iter()
        .map(|ts| ts.date_naive())
        .collect();

    let today = Utc::now().date_naive();
    let current = history::current_streak(days.iter().copied(), today);
    let longest = history::longest_streak(days, today);

    let cached = i32::try_from(current).unwrap_or(i32::MAX);
    if cached != user.current_streak {
        match db::users::update_current_streak(&state.db, user_id, cached).await {
            Ok(()) => tracing::debug!(
                user_id = %user_id,
                previous = user.current_streak,
                current = cached,
                "Cached streak repaired"
            ),
            Err(e) => tracing::warn!(user_id = %user_id, error = %e, "Failed to update cached streak"),
        }
    }

    Ok(StreakResponse {
        current_streak: current,
        longest_streak: longest,
    })
}

async fn load_weekly(state: &AppState, user_id: Uuid) -> AppResult<WeeklyAverage> {
    let now = Utc::now();
    let recent = db::check_ins::since(&state.db, user_id, now - Duration::days(WEEKLY_WINDOW_DAYS)).await?;
    let mood = history::weekly_average(recent.iter().map(|c| (c.date, c.humor)), now);
    Ok(mood.into())
}

pub async fn get_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<ProgressResponse>> {
    query.validate()?;

    let streak = sync_streak(&state, auth_user.id).await?;
    let weekly_average = load_weekly(&state, auth_user.id).await?;

    let filter = HistoryFilter {
        limit: Some(query.recent.unwrap_or(DEFAULT_RECENT_LIMIT)),
        ..HistoryFilter::default()
    };
    let recent = db::check_ins::list(&state.db, auth_user.id, &filter).await?;

    Ok(Json(ProgressResponse {
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        weekly_average,
        recent,
    }))
}

pub async fn get_streak(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<StreakResponse>> {
    Ok(Json(sync_streak(&state, auth_user.id).await?))
}

pub async fn get_weekly_average(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<WeeklyAverage>> {
    Ok(Json(load_weekly(&state, auth_user.id).await?))
}
