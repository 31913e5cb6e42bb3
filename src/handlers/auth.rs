use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::{
    jwt::create_session_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::db;
use crate::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserProfile};
use crate::AppState;

const DUPLICATE_EMAIL: &str = "Email already registered";

/// Issue a token and persist its session row.
async fn start_session(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = create_session_token(user.id, &user.email, &state.config)?;
    db::sessions::insert(&state.db, token.session_id, user.id, token.expires_at).await?;

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    if db::users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
    }

    let pwd_hash = hash_password(&body.password)?;
    // A concurrent sign-up can still win the race to the unique email index.
    let user = db::users::insert(&state.db, &email, &pwd_hash, body.name.trim())
        .await
        .map_err(|e| AppError::on_unique_violation(e, DUPLICATE_EMAIL))?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(start_session(&state, user).await?))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let user = db::users::find_by_email(&state.db, body.email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(Json(start_session(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    db::sessions::revoke(&state.db, auth_user.session_id).await?;
    tracing::info!(user_id = %auth_user.id, "Session revoked");
    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = db::users::find_by_id(&state.db, auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
