use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{DocsResponse, FilterRequest, SearchRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// Nearest-neighbor match for each query document
pub async fn search_docs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<DocsResponse>, ApiError> {
    let params = state.search_defaults.merge(request.parameters.as_ref());

    tracing::info!(
        queries = request.docs.len(),
        limit = params.limit,
        has_filter = params.filter.is_some(),
        "Processing search request"
    );

    let mut docs = request.docs;
    for doc in &mut docs {
        let embedding = doc.embedding.clone().ok_or_else(|| {
            ApiError::bad_request(format!("Query document {} has no embedding", doc.id))
        })?;
        doc.matches = state.index.search(&embedding, &params).await?;
    }

    Ok(Json(DocsResponse { docs }))
}

/// Query by predicate only
pub async fn filter_docs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<DocsResponse>, ApiError> {
    let docs = state.index.find(&request.query, request.limit).await?;
    Ok(Json(DocsResponse { docs }))
}
