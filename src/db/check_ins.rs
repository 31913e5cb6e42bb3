use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::check_in::{CheckIn, CheckInRow, HistoryFilter, NewCheckIn};

pub async fn insert(db: &PgPool, new: NewCheckIn) -> Result<CheckIn, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO check_ins
            (id, user_id, checked_in_at, humor, energia, sono, justificativa,
             foto_status, analise, analysis_source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(new.id)
    .bind(new.user_id)
    .bind(new.date)
    .bind(new.questionnaire.humor.label())
    .bind(new.questionnaire.energia.label())
    .bind(new.questionnaire.sono.label())
    .bind(new.questionnaire.note())
    .bind(new.foto_status.label())
    .bind(Json(&new.analysis))
    .bind(Json(&new.analysis_source))
    .execute(db)
    .await?;

    Ok(new.into_check_in())
}

/// History for one user, newest first.
pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    filter: &HistoryFilter,
) -> Result<Vec<CheckIn>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CheckInRow>(
        r#"
        SELECT * FROM check_ins
        WHERE user_id = $1
          AND ($2::date IS NULL OR (checked_in_at AT TIME ZONE 'UTC')::date >= $2)
          AND ($3::date IS NULL OR (checked_in_at AT TIME ZONE 'UTC')::date <= $3)
        ORDER BY checked_in_at DESC
        LIMIT $4
        "#,
    )
    .bind(user_id)
    .bind(filter.start)
    .bind(filter.end)
    .bind(filter.limit)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(CheckIn::from).collect())
}

/// Timestamps of every check-in, newest first. Enough for streak walks.
pub async fn timestamps(db: &PgPool, user_id: Uuid) -> Result<Vec<DateTime<Utc>>, sqlx::Error> {
    sqlx::query_scalar::<_, DateTime<Utc>>(
        "SELECT checked_in_at FROM check_ins WHERE user_id = $1 ORDER BY checked_in_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Check-ins at or after `since`, newest first.
pub async fn since(
    db: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<CheckIn>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CheckInRow>(
        r#"
        SELECT * FROM check_ins
        WHERE user_id = $1 AND checked_in_at >= $2
        ORDER BY checked_in_at DESC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(CheckIn::from).collect())
}
