use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    /// Session id; revoked on logout.
    pub jti: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(skip)]
    pub session_id: Uuid,
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

pub fn create_session_token(user_id: Uuid, email: &str, config: &Config) -> AppResult<SessionToken> {
    let now = Utc::now();
    let expires_at = now + Duration::seconds(config.jwt_ttl_secs);
    let session_id = Uuid::new_v4();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: session_id,
    };

    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create session token: {}", e)))?;

    Ok(SessionToken {
        access_token,
        expires_in: config.jwt_ttl_secs,
        session_id,
        expires_at,
    })
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/eunoia_test".into(),
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:8081".into(),
        jwt_secret: "test-secret-that-is-long-enough".into(),
        jwt_ttl_secs: 3600,
        gemini: crate::config::GeminiConfig::default(),
    }
}
