use sqlx::{Executor, Postgres};

use crate::models::{NewTestResult, NewTestResultDetail, TestResult, TestResultDetail};

pub async fn insert_test_result<'e, E>(
    executor: E,
    result: &NewTestResult,
) -> Result<TestResult, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO test_results (user_id, subject, test_name, total_score, max_score,
                                      score_percentage, overall_analysis, analysis_source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, subject, test_name, total_score, max_score,
                      score_percentage, overall_analysis, analysis_source, created_at
        "#,
    )
    .bind(result.user_id)
    .bind(&result.subject)
    .bind(&result.test_name)
    .bind(result.total_score)
    .bind(result.max_score)
    .bind(result.score_percentage)
    .bind(&result.overall_analysis)
    .bind(&result.analysis_source)
    .fetch_one(executor)
    .await
}

pub async fn insert_test_result_detail<'e, E>(
    executor: E,
    test_result_id: i64,
    detail: &NewTestResultDetail,
) -> Result<TestResultDetail, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO test_result_details (test_result_id, topic, correct_count,
                                             total_count, score_percentage,
                                             weakness_analysis, improvement_advice)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, test_result_id, topic, correct_count, total_count,
                      score_percentage, weakness_analysis, improvement_advice
        "#,
    )
    .bind(test_result_id)
    .bind(&detail.topic)
    .bind(detail.correct_count)
    .bind(detail.total_count)
    .bind(detail.score_percentage)
    .bind(&detail.weakness_analysis)
    .bind(&detail.improvement_advice)
    .fetch_one(executor)
    .await
}

/// Test results of a user, newest first.
pub async fn list_test_results<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Vec<TestResult>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, subject, test_name, total_score, max_score,
                   score_percentage, overall_analysis, analysis_source, created_at
            FROM test_results
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Details for a batch of test results, in insertion order.
pub async fn list_details_for_results<'e, E>(
    executor: E,
    test_result_ids: &[i64],
) -> Result<Vec<TestResultDetail>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, test_result_id, topic, correct_count, total_count,
                   score_percentage, weakness_analysis, improvement_advice
            FROM test_result_details
            WHERE test_result_id = ANY($1)
            ORDER BY test_result_id, id
        "#,
    )
    .bind(test_result_ids)
    .fetch_all(executor)
    .await
}
