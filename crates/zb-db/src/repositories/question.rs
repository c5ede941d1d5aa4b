use sqlx::{Executor, Postgres, types::Json};

use crate::models::{NewQuestion, Question};

pub async fn get_question<'e, E>(
    executor: E,
    question_id: i64,
) -> Result<Option<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, subject, topic, stem, choices, answer, hint, explanation,
                   difficulty, source, created_at
            FROM questions
            WHERE id = $1
        "#,
    )
    .bind(question_id)
    .fetch_optional(executor)
    .await
}

/// Ids of every question, optionally restricted to one subject.
pub async fn list_question_ids<'e, E>(
    executor: E,
    subject: Option<&str>,
) -> Result<Vec<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT id
            FROM questions
            WHERE $1::text IS NULL OR subject = $1
            ORDER BY id
        "#,
    )
    .bind(subject)
    .fetch_all(executor)
    .await
}

pub async fn insert_question<'e, E>(
    executor: E,
    question: &NewQuestion,
) -> Result<Question, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO questions (subject, topic, stem, choices, answer, hint, explanation,
                                   difficulty, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, subject, topic, stem, choices, answer, hint, explanation,
                      difficulty, source, created_at
        "#,
    )
    .bind(&question.subject)
    .bind(&question.topic)
    .bind(&question.stem)
    .bind(question.choices.as_ref().map(Json))
    .bind(Json(&question.answer))
    .bind(&question.hint)
    .bind(&question.explanation)
    .bind(question.difficulty)
    .bind(&question.source)
    .fetch_one(executor)
    .await
}

pub async fn count_questions<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(executor)
    .await
}
