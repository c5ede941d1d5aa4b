use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use zb_db::{models::Topic, repositories::topic};

use crate::{
    ApiState,
    error::ApiError,
    validation::{validate_id, validate_subject},
};

/// Create the topic routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/topics", get(list_topics))
        .route("/topics/{topic_id}/prerequisites", get(list_prerequisites))
}

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrerequisitesResponse {
    pub topic: Topic,
    pub prerequisites: Vec<Topic>,
}

async fn list_topics(
    State(state): State<ApiState>,
    Query(query): Query<TopicQuery>,
) -> Result<Json<TopicsResponse>, ApiError> {
    let subject = query.subject.as_deref().map(str::trim);
    validate_subject(subject)?;

    let topics = topic::list_topics(&state.pool, subject).await?;

    Ok(Json(TopicsResponse { topics }))
}

async fn list_prerequisites(
    State(state): State<ApiState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<PrerequisitesResponse>, ApiError> {
    validate_id(topic_id, "topic_id")?;

    let topic = topic::get_topic(&state.pool, topic_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Topic {topic_id} not found")))?;
    let prerequisites = topic::list_prerequisites(&state.pool, topic_id).await?;

    Ok(Json(PrerequisitesResponse {
        topic,
        prerequisites,
    }))
}
