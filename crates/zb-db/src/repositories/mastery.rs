use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use zb_srs::MasteryState;

use crate::models::{MasteryOverview, MasteryRow};

pub async fn get_mastery<'e, E>(
    executor: E,
    user_id: i64,
    question_id: i64,
) -> Result<Option<MasteryRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, question_id, value, consecutive_correct, stability,
                   last_review_at, next_review_at, updated_at
            FROM mastery
            WHERE user_id = $1 AND question_id = $2
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_optional(executor)
    .await
}

/// Insert a default mastery row unless one exists.
///
/// Inside a transaction this makes the following `FOR UPDATE` read lock a row
/// even for a user's first answer, so concurrent first answers queue up
/// instead of both starting from the default state.
pub async fn ensure_mastery_row<'e, E>(
    executor: E,
    user_id: i64,
    question_id: i64,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO mastery (user_id, question_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, question_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Lock the mastery row for the rest of the transaction, if it exists.
pub async fn get_mastery_for_update<'e, E>(
    executor: E,
    user_id: i64,
    question_id: i64,
) -> Result<Option<MasteryRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, question_id, value, consecutive_correct, stability,
                   last_review_at, next_review_at, updated_at
            FROM mastery
            WHERE user_id = $1 AND question_id = $2
            FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_optional(executor)
    .await
}

pub async fn upsert_mastery<'e, E>(
    executor: E,
    user_id: i64,
    question_id: i64,
    state: &MasteryState,
) -> Result<MasteryRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO mastery (user_id, question_id, value, consecutive_correct, stability,
                                 last_review_at, next_review_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, question_id)
            DO UPDATE SET
                value = $3,
                consecutive_correct = $4,
                stability = $5,
                last_review_at = $6,
                next_review_at = $7,
                updated_at = NOW()
            RETURNING user_id, question_id, value, consecutive_correct, stability,
                      last_review_at, next_review_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .bind(state.value)
    .bind(state.consecutive_correct)
    .bind(state.stability)
    .bind(state.last_review_at)
    .bind(state.next_review_at)
    .fetch_one(executor)
    .await
}

/// Question ids whose review date for the user has passed at `now`.
pub async fn due_question_ids<'e, E>(
    executor: E,
    user_id: i64,
    subject: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT m.question_id
            FROM mastery m
            JOIN questions q ON q.id = m.question_id
            WHERE m.user_id = $1
              AND m.next_review_at <= $2
              AND ($3::text IS NULL OR q.subject = $3)
            ORDER BY m.next_review_at
        "#,
    )
    .bind(user_id)
    .bind(now)
    .bind(subject)
    .fetch_all(executor)
    .await
}

/// All mastery rows of a user with their question topic, soonest review first.
pub async fn list_user_mastery<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Vec<MasteryOverview>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                m.question_id,
                q.subject,
                q.topic,
                m.value,
                m.consecutive_correct,
                m.stability,
                m.last_review_at,
                m.next_review_at,
                (SELECT COUNT(*) FROM attempts a
                 WHERE a.user_id = m.user_id AND a.question_id = m.question_id) AS attempts
            FROM mastery m
            JOIN questions q ON q.id = m.question_id
            WHERE m.user_id = $1
            ORDER BY m.next_review_at ASC NULLS FIRST, m.question_id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
