use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use zb_db::{
    models::Question,
    repositories::{mastery, question},
    seed::DEMO_USER_ID,
};
use zb_srs::{SelectionMode, SelectionReason, select_next};

use crate::{
    ApiState,
    error::ApiError,
    validation::{validate_id, validate_subject},
};

/// Create the practice routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/next-question", post(next_question))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NextQuestionRequest {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub mode: SelectionMode,
}

fn default_user_id() -> i64 {
    DEMO_USER_ID
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NextQuestionResponse {
    pub question: Option<Question>,
    pub reason: Option<SelectionReason>,
}

impl NextQuestionResponse {
    fn empty() -> Self {
        Self {
            question: None,
            reason: None,
        }
    }
}

/// Pick the next question: a due review when there is one, otherwise any question.
async fn next_question(
    State(state): State<ApiState>,
    Json(payload): Json<NextQuestionRequest>,
) -> Result<Json<NextQuestionResponse>, ApiError> {
    validate_id(payload.user_id, "user_id")?;
    let subject = payload.subject.as_deref().map(str::trim);
    validate_subject(subject)?;

    let due = match payload.mode {
        SelectionMode::Review => {
            mastery::due_question_ids(&state.pool, payload.user_id, subject, Utc::now()).await?
        }
        SelectionMode::Random => Vec::new(),
    };
    let all = question::list_question_ids(&state.pool, subject).await?;

    // ThreadRng is not Send, keep it out of any await
    let selection = {
        let mut rng = rand::thread_rng();
        select_next(&due, &all, payload.mode, &mut rng)
    };

    let Some(selection) = selection else {
        tracing::debug!(user_id = payload.user_id, ?subject, "No question available");
        return Ok(Json(NextQuestionResponse::empty()));
    };

    // The question may have been deleted since the id lists were read
    let question = question::get_question(&state.pool, selection.question_id).await?;
    let reason = question.as_ref().map(|_| selection.reason);

    tracing::debug!(
        user_id = payload.user_id,
        question_id = selection.question_id,
        reason = ?selection.reason,
        "Next question selected"
    );

    Ok(Json(NextQuestionResponse { question, reason }))
}
