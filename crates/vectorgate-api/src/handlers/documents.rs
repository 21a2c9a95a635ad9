use std::sync::Arc;

use axum::{extract::State, Json};

use vectorgate_core::models::DocId;
use vectorgate_core::VectorgateError;

use crate::dto::{
    DeleteRequest, DocsResponse, FillEmbeddingRequest, IndexRequest, IndexResponse, OpResponse,
    UpdateRequest, UpdateResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Append documents to the index
pub async fn index_docs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<IndexResponse>, ApiError> {
    if request.docs.is_empty() {
        return Ok(Json(IndexResponse { indexed: 0 }));
    }

    tracing::info!(count = request.docs.len(), "Indexing documents");
    state.index.extend(&request.docs).await?;

    Ok(Json(IndexResponse { indexed: request.docs.len() }))
}

/// Update documents with the same id; missing ids are logged and skipped
pub async fn update_docs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let mut updated = 0;
    let mut skipped = Vec::new();

    for doc in &request.docs {
        match state.index.replace(doc).await {
            Ok(()) => updated += 1,
            Err(VectorgateError::DocumentNotFound { id }) => {
                tracing::warn!(id = %id, "Cannot update document as it does not exist in storage");
                skipped.push(id);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Json(UpdateResponse { updated, skipped }))
}

/// Delete documents by id
pub async fn delete_docs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<OpResponse>, ApiError> {
    if request.ids.is_empty() {
        return Ok(Json(OpResponse::success("Nothing to delete")));
    }

    let ids: Vec<DocId> = request.ids.into_iter().map(DocId::from).collect();
    state.index.delete(&ids).await?;

    Ok(Json(OpResponse::success(format!("Deleted {} ids", ids.len()))))
}

/// Copy the stored embedding onto each input document
pub async fn fill_embedding(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FillEmbeddingRequest>,
) -> Result<Json<DocsResponse>, ApiError> {
    let mut docs = request.docs;

    for doc in &mut docs {
        doc.embedding = Some(state.index.embedding(&doc.id).await?);
    }

    Ok(Json(DocsResponse { docs }))
}

/// Remove every document from the index
pub async fn clear_index(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OpResponse>, ApiError> {
    state.index.clear().await?;
    Ok(Json(OpResponse::success("Index cleared")))
}
