use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;
use zb_db::{
    models::{NewAttempt, Question},
    repositories::{attempt, mastery, question, user},
    seed::DEMO_USER_ID,
};
use zb_srs::MasteryState;

use super::{
    grading,
    model::{AnswerResult, AnswerSubmission, MasterySnapshot},
};
use crate::{
    ApiState,
    error::ApiError,
    metrics,
    validation::{validate_id, validate_payload},
};

/// Create the question routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/questions/{question_id}", get(get_question))
        .route("/questions/{question_id}/answer", post(submit_answer))
}

async fn get_question(
    State(state): State<ApiState>,
    Path(question_id): Path<i64>,
) -> Result<Json<Question>, ApiError> {
    validate_id(question_id, "question_id")?;

    let question = question::get_question(&state.pool, question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} not found")))?;

    Ok(Json(question))
}

/// Grade an answer, log the attempt and update mastery in one transaction.
async fn submit_answer(
    State(state): State<ApiState>,
    Path(question_id): Path<i64>,
    Json(payload): Json<AnswerSubmission>,
) -> Result<Json<AnswerResult>, ApiError> {
    validate_id(question_id, "question_id")?;
    validate_payload(&payload)?;
    let user_id = payload.user_id.unwrap_or(DEMO_USER_ID);
    validate_id(user_id, "user_id")?;

    let mut tx = state.pool.begin().await.map_err(ApiError::Database)?;

    let question = question::get_question(&mut *tx, question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} not found")))?;

    if !user::user_exists(&mut *tx, user_id).await? {
        return Err(ApiError::NotFound(format!("User {user_id} not found")));
    }

    let is_correct = grading::is_correct(&question.answer, &payload.user_answer);

    attempt::insert_attempt(
        &mut *tx,
        &NewAttempt {
            user_id,
            question_id,
            user_answer: payload.user_answer,
            correct: is_correct,
            elapsed_seconds: payload.elapsed_seconds,
            mistake_category: payload
                .mistake_category
                .map(|category| category.as_str().to_string()),
        },
    )
    .await?;

    // Row lock serializes concurrent answers to the same question by the same user,
    // including the very first one
    mastery::ensure_mastery_row(&mut *tx, user_id, question_id).await?;
    let previous = mastery::get_mastery_for_update(&mut *tx, user_id, question_id)
        .await?
        .map(|row| MasteryState::from(&row))
        .unwrap_or_default();

    let updated = state
        .mastery_policy
        .update(&previous, is_correct, Utc::now());
    let row = mastery::upsert_mastery(&mut *tx, user_id, question_id, &updated).await?;

    tx.commit().await.map_err(ApiError::Database)?;

    metrics::record_answer(is_correct);
    tracing::info!(
        user_id,
        question_id,
        is_correct,
        mastery = row.value,
        streak = row.consecutive_correct,
        "Answer graded"
    );

    let answer = question.answer.0;
    Ok(Json(AnswerResult {
        is_correct,
        correct_answer: answer.value,
        unit: answer.unit,
        mastery: MasterySnapshot {
            value: row.value,
            consecutive_correct: row.consecutive_correct,
            stability: row.stability,
            next_review_at: row.next_review_at,
        },
    }))
}
