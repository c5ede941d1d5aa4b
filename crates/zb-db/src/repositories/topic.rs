use sqlx::{Executor, Postgres};

use crate::models::Topic;

pub async fn list_topics<'e, E>(
    executor: E,
    subject: Option<&str>,
) -> Result<Vec<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, subject, domain, name, difficulty
            FROM topics
            WHERE $1::text IS NULL OR subject = $1
            ORDER BY subject, id
        "#,
    )
    .bind(subject)
    .fetch_all(executor)
    .await
}

pub async fn get_topic<'e, E>(executor: E, topic_id: i64) -> Result<Option<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, subject, domain, name, difficulty
            FROM topics
            WHERE id = $1
        "#,
    )
    .bind(topic_id)
    .fetch_optional(executor)
    .await
}

/// Direct prerequisites of a topic.
pub async fn list_prerequisites<'e, E>(
    executor: E,
    topic_id: i64,
) -> Result<Vec<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT t.id, t.subject, t.domain, t.name, t.difficulty
            FROM topic_dependencies d
            JOIN topics t ON t.id = d.prerequisite_topic_id
            WHERE d.topic_id = $1
            ORDER BY t.id
        "#,
    )
    .bind(topic_id)
    .fetch_all(executor)
    .await
}

/// Insert a topic if absent and return its id either way.
pub async fn upsert_topic<'e, E>(
    executor: E,
    subject: &str,
    domain: Option<&str>,
    name: &str,
    difficulty: &str,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO topics (subject, domain, name, difficulty)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject, name)
            DO UPDATE SET domain = EXCLUDED.domain, difficulty = EXCLUDED.difficulty
            RETURNING id
        "#,
    )
    .bind(subject)
    .bind(domain)
    .bind(name)
    .bind(difficulty)
    .fetch_one(executor)
    .await
}

pub async fn add_dependency<'e, E>(
    executor: E,
    topic_id: i64,
    prerequisite_topic_id: i64,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO topic_dependencies (topic_id, prerequisite_topic_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
        "#,
    )
    .bind(topic_id)
    .bind(prerequisite_topic_id)
    .execute(executor)
    .await?;
    Ok(())
}
