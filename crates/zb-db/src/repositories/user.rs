use sqlx::{Executor, Postgres};

pub async fn user_exists<'e, E>(executor: E, user_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Insert a user and return its generated id.
pub async fn create_user<'e, E>(
    executor: E,
    role: &str,
    parent_id: Option<i64>,
    grade: Option<i32>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO users (role, parent_id, grade)
            VALUES ($1, $2, $3)
            RETURNING id
        "#,
    )
    .bind(role)
    .bind(parent_id)
    .bind(grade)
    .fetch_one(executor)
    .await
}
