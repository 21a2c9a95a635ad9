use serde::Deserialize;

use vectorgate_core::filter::FilterExpr;
use vectorgate_core::models::{Document, SearchOverrides};

/// Index request body
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    #[serde(default)]
    pub docs: Vec<Document>,
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub docs: Vec<Document>,

    /// Per-request match arguments, merged over the configured defaults
    #[serde(default)]
    pub parameters: Option<SearchOverrides>,
}

/// Delete request body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Update request body
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub docs: Vec<Document>,
}

/// Filter request body
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub query: FilterExpr,

    #[serde(default)]
    pub limit: Option<usize>,
}

/// Fill-embedding request body
#[derive(Debug, Deserialize)]
pub struct FillEmbeddingRequest {
    #[serde(default)]
    pub docs: Vec<Document>,
}
