use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{ai, mastery, practice, question, state::ApiState, test_result, topic};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(question::routes())
        .merge(practice::routes())
        .merge(ai::routes())
        .merge(topic::routes())
        .merge(mastery::routes())
        .merge(test_result::routes())
        .fallback(handler_404)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Ready once the database answers and every required table exists
async fn readiness(State(state): State<ApiState>) -> Response {
    match zb_db::missing_tables(&state.pool).await {
        Ok(missing) if missing.is_empty() => Json(json!({ "ready": true })).into_response(),
        Ok(missing) => {
            tracing::warn!(?missing, "Schema incomplete, run the migrate binary");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ready": false, "missing_tables": missing })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ready": false, "error": "database unavailable" })),
            )
                .into_response()
        }
    }
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
