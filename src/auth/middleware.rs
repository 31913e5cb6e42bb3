use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::db;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub session_id: Uuid,
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(bearer.token(), &state.config)?;
    let claims = token_data.claims;

    let session = db::sessions::find(&state.db, claims.jti)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if session.user_id != claims.sub || !session.is_active(Utc::now()) {
        tracing::debug!(user_id = %claims.sub, session_id = %claims.jti, "Rejected inactive session");
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        session_id: claims.jti,
    });
    Ok(next.run(req).await)
}
