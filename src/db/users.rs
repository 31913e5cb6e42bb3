use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;

pub async fn insert(
    db: &PgPool,
    email: &str,
    password_hash: &str,
    name: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, name, current_streak)
        VALUES ($1, $2, $3, $4, 0)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .fetch_one(db)
    .await
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn update_current_streak(db: &PgPool, id: Uuid, streak: i32) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET current_streak = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(streak)
        .execute(db)
        .await?;
    Ok(())
}
