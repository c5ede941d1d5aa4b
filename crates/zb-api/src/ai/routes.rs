use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zb_db::{
    models::{NewQuestion, Question},
    repositories::question,
};

use crate::{
    ApiState,
    error::ApiError,
    make_rate_limit_layer,
    middleware::rate_limit::{GENERAL_BURST_SIZE, GENERAL_RATE_PER_SECOND},
    question::grading,
    validation::{validate_id, validate_payload},
};

const VARIANT_SUFFIX: &str = "（類題）";

/// Create the AI helper routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/ai/explain", post(explain))
        .route("/ai/generate-variant", post(generate_variant))
        .layer(make_rate_limit_layer!(
            GENERAL_RATE_PER_SECOND,
            GENERAL_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ExplainRequest {
    pub question_id: i64,
    #[validate(length(max = 1000))]
    pub user_answer: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
    /// Present when the request carried an answer to grade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct GenerateVariantRequest {
    pub question_id: i64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub difficulty: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GenerateVariantResponse {
    pub question: Question,
}

async fn load_question(state: &ApiState, question_id: i64) -> Result<Question, ApiError> {
    question::get_question(&state.pool, question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} not found")))
}

/// Explain a question, preferring the stored worked explanation.
async fn explain(
    State(state): State<ApiState>,
    Json(payload): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    validate_id(payload.question_id, "question_id")?;
    validate_payload(&payload)?;

    let question = load_question(&state, payload.question_id).await?;

    let is_correct = payload
        .user_answer
        .as_deref()
        .map(|answer| grading::is_correct(&question.answer, answer));

    Ok(Json(ExplainResponse {
        explanation: explanation_for(&question),
        is_correct,
    }))
}

fn explanation_for(question: &Question) -> String {
    if let Some(explanation) = question
        .explanation
        .as_deref()
        .filter(|e| !e.trim().is_empty())
    {
        return explanation.to_string();
    }

    let answer = grading::display_answer(&question.answer);
    match question.hint.as_deref().filter(|h| !h.trim().is_empty()) {
        Some(hint) => format!("ヒント: {hint}。正解は{answer}です。"),
        None => format!("正解は{answer}です。"),
    }
}

/// Store a similar practice question derived from an existing one.
async fn generate_variant(
    State(state): State<ApiState>,
    Json(payload): Json<GenerateVariantRequest>,
) -> Result<Json<GenerateVariantResponse>, ApiError> {
    validate_id(payload.question_id, "question_id")?;
    validate_payload(&payload)?;

    let source = load_question(&state, payload.question_id).await?;
    let variant = variant_of(&source, payload.difficulty);
    let question = question::insert_question(&state.pool, &variant).await?;

    tracing::info!(
        source_id = source.id,
        variant_id = question.id,
        "Variant question generated"
    );

    Ok(Json(GenerateVariantResponse { question }))
}

fn variant_of(source: &Question, difficulty: Option<f64>) -> NewQuestion {
    let mut variant = NewQuestion::from(source);
    if !variant.topic.ends_with(VARIANT_SUFFIX) {
        variant.topic.push_str(VARIANT_SUFFIX);
    }
    variant.source = Some(format!("variant:{}", source.id));
    if let Some(difficulty) = difficulty {
        variant.difficulty = difficulty;
    }
    variant
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;
    use zb_db::models::QuestionAnswer;

    use super::*;

    fn question(hint: Option<&str>, explanation: Option<&str>) -> Question {
        Question {
            id: 7,
            subject: "算数".to_string(),
            topic: "割合".to_string(),
            stem: "原価の25%利益で販売1,250円。原価は？".to_string(),
            choices: None,
            answer: Json(QuestionAnswer {
                value: "1000".to_string(),
                variants: Vec::new(),
                unit: Some("円".to_string()),
            }),
            hint: hint.map(String::from),
            explanation: explanation.map(String::from),
            difficulty: 2.0,
            source: Some("seed".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stored_explanation_wins() {
        let q = question(Some("販売=原価×1.25"), Some("1250÷1.25=1000"));
        assert_eq!(explanation_for(&q), "1250÷1.25=1000");
    }

    #[test]
    fn test_hint_fallback() {
        let q = question(Some("販売=原価×1.25"), None);
        assert_eq!(
            explanation_for(&q),
            "ヒント: 販売=原価×1.25。正解は1000円です。"
        );

        let q = question(None, Some("  "));
        assert_eq!(explanation_for(&q), "正解は1000円です。");
    }

    #[test]
    fn test_variant_of() {
        let source = question(None, None);
        let variant = variant_of(&source, Some(3.5));

        assert_eq!(variant.topic, "割合（類題）");
        assert_eq!(variant.source.as_deref(), Some("variant:7"));
        assert_eq!(variant.difficulty, 3.5);
        assert_eq!(variant.answer, source.answer.0);
        assert_eq!(variant.stem, source.stem);
    }

    #[test]
    fn test_variant_of_variant_keeps_single_suffix() {
        let mut source = question(None, None);
        source.topic = "割合（類題）".to_string();

        let variant = variant_of(&source, None);
        assert_eq!(variant.topic, "割合（類題）");
        assert_eq!(variant.difficulty, 2.0);
    }
}
