use sqlx::{Executor, Postgres};

use crate::models::{Attempt, NewAttempt};

/// Append one attempt to the log.
pub async fn insert_attempt<'e, E>(
    executor: E,
    attempt: &NewAttempt,
) -> Result<Attempt, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO attempts (user_id, question_id, user_answer, correct, elapsed_seconds,
                                  mistake_category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, question_id, user_answer, correct, elapsed_seconds,
                      mistake_category, created_at
        "#,
    )
    .bind(attempt.user_id)
    .bind(attempt.question_id)
    .bind(&attempt.user_answer)
    .bind(attempt.correct)
    .bind(attempt.elapsed_seconds)
    .bind(&attempt.mistake_category)
    .fetch_one(executor)
    .await
}

/// Attempts of one user on one question, newest first.
pub async fn list_attempts<'e, E>(
    executor: E,
    user_id: i64,
    question_id: i64,
) -> Result<Vec<Attempt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, question_id, user_answer, correct, elapsed_seconds,
                   mistake_category, created_at
            FROM attempts
            WHERE user_id = $1 AND question_id = $2
            ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_all(executor)
    .await
}
