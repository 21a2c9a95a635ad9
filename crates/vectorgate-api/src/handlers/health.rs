use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::dto::{HealthResponse, StatusResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::default())
}

pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let count = state.index.count().await?;

    Ok(Json(StatusResponse {
        collection: state.collection.clone(),
        distance: state.distance.as_str(),
        count,
    }))
}
