use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use zb_db::{
    models::MasteryOverview,
    repositories::{mastery, user},
};

use crate::{ApiState, error::ApiError, validation::validate_id};

/// Create the mastery routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/users/{user_id}/mastery", get(user_mastery))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMasteryResponse {
    pub user_id: i64,
    /// Soonest review first
    pub mastery: Vec<MasteryOverview>,
}

/// Per-question mastery of a user, the data behind the weakness map.
async fn user_mastery(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserMasteryResponse>, ApiError> {
    validate_id(user_id, "user_id")?;

    if !user::user_exists(&state.pool, user_id).await? {
        return Err(ApiError::NotFound(format!("User {user_id} not found")));
    }

    let mastery = mastery::list_user_mastery(&state.pool, user_id).await?;

    Ok(Json(UserMasteryResponse { user_id, mastery }))
}
