use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zb_db::{
    models::{NewTestResult, NewTestResultDetail, TestResultDetail, TestResultWithDetails},
    repositories::{test_result, user},
    seed::DEMO_USER_ID,
};

use super::parser::parse_test_result;
use crate::{
    ApiState,
    analysis::{Analysis, ScoreSummary},
    error::ApiError,
    make_rate_limit_layer,
    middleware::rate_limit::{GENERAL_BURST_SIZE, GENERAL_RATE_PER_SECOND},
    validation::{validate_id, validate_payload},
};

/// Column widths of the text fields stored with a result
const MAX_SUBJECT_CHARS: usize = 64;
const MAX_NAME_CHARS: usize = 255;

/// Create the test result routes
pub fn routes() -> Router<ApiState> {
    let upload = Router::new()
        .route("/test-results", post(submit_test_result))
        .layer(make_rate_limit_layer!(
            GENERAL_RATE_PER_SECOND,
            GENERAL_BURST_SIZE
        ));

    Router::new()
        .route("/test-results/{user_id}", get(list_test_results))
        .merge(upload)
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TestResultSubmission {
    pub user_id: Option<i64>,
    #[validate(length(min = 1, max = 64))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub test_name: Option<String>,
    /// Text already extracted from the scanned sheet or PDF
    #[validate(length(min = 1, max = 100000))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestResultsResponse {
    pub test_results: Vec<TestResultWithDetails>,
}

/// Parse an uploaded test result, analyze weak topics and store both.
async fn submit_test_result(
    State(state): State<ApiState>,
    Json(payload): Json<TestResultSubmission>,
) -> Result<Json<TestResultWithDetails>, ApiError> {
    validate_payload(&payload)?;
    let user_id = payload.user_id.unwrap_or(DEMO_USER_ID);
    validate_id(user_id, "user_id")?;

    if !user::user_exists(&state.pool, user_id).await? {
        return Err(ApiError::NotFound(format!("User {user_id} not found")));
    }

    let mut summary = parse_test_result(&payload.text);
    if let Some(subject) = payload.subject {
        summary.subject = subject;
    }
    if let Some(test_name) = payload.test_name {
        summary.test_name = test_name;
    }

    // No transaction is held while the LLM is working
    let analysis = state.analyzer.analyze(&summary).await;

    let (new_result, new_details) = to_records(user_id, &summary, analysis);

    let mut tx = state.pool.begin().await.map_err(ApiError::Database)?;
    let result = test_result::insert_test_result(&mut *tx, &new_result).await?;
    let mut topics = Vec::with_capacity(new_details.len());
    for detail in &new_details {
        topics.push(test_result::insert_test_result_detail(&mut *tx, result.id, detail).await?);
    }
    tx.commit().await.map_err(ApiError::Database)?;

    tracing::info!(
        user_id,
        test_result_id = result.id,
        topics = topics.len(),
        source = %result.analysis_source,
        "Test result stored"
    );

    Ok(Json(TestResultWithDetails { result, topics }))
}

async fn list_test_results(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<TestResultsResponse>, ApiError> {
    validate_id(user_id, "user_id")?;

    let results = test_result::list_test_results(&state.pool, user_id).await?;
    let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
    let details = if ids.is_empty() {
        Vec::new()
    } else {
        test_result::list_details_for_results(&state.pool, &ids).await?
    };

    Ok(Json(TestResultsResponse {
        test_results: attach_details(results, details),
    }))
}

fn attach_details(
    results: Vec<zb_db::models::TestResult>,
    details: Vec<TestResultDetail>,
) -> Vec<TestResultWithDetails> {
    let mut by_result: HashMap<i64, Vec<TestResultDetail>> = HashMap::new();
    for detail in details {
        by_result.entry(detail.test_result_id).or_default().push(detail);
    }

    results
        .into_iter()
        .map(|result| TestResultWithDetails {
            topics: by_result.remove(&result.id).unwrap_or_default(),
            result,
        })
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn to_records(
    user_id: i64,
    summary: &ScoreSummary,
    analysis: Analysis,
) -> (NewTestResult, Vec<NewTestResultDetail>) {
    let result = NewTestResult {
        user_id,
        subject: truncate_chars(&summary.subject, MAX_SUBJECT_CHARS),
        test_name: truncate_chars(&summary.test_name, MAX_NAME_CHARS),
        total_score: summary.total_score,
        max_score: summary.max_score,
        score_percentage: summary.score_percentage,
        overall_analysis: analysis.overall_analysis,
        analysis_source: analysis.source.as_str().to_string(),
    };

    let details = analysis
        .topics
        .into_iter()
        .map(|topic| NewTestResultDetail {
            topic: truncate_chars(&topic.topic, MAX_NAME_CHARS),
            correct_count: topic.correct_count,
            total_count: topic.total_count,
            score_percentage: topic.score_percentage,
            weakness_analysis: topic.weakness_analysis,
            improvement_advice: topic.improvement_advice,
        })
        .collect();

    (result, details)
}
