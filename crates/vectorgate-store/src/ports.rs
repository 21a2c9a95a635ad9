use async_trait::async_trait;
use vectorgate_core::error::Result;
use vectorgate_core::filter::FilterExpr;
use vectorgate_core::models::{DocId, Document, ScoredMatch, SearchParams};

/// Port for document storage and similarity search
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Append documents to the index
    async fn extend(&self, docs: &[Document]) -> Result<()>;

    /// Overwrite the document with the same id
    ///
    /// Errors with `DocumentNotFound` when the id is absent; never inserts.
    async fn replace(&self, doc: &Document) -> Result<()>;

    /// Remove documents by id; unknown ids are ignored
    async fn delete(&self, ids: &[DocId]) -> Result<()>;

    /// Retrieve the stored embedding for an id
    async fn embedding(&self, id: &DocId) -> Result<Vec<f32>>;

    /// Nearest-neighbor match for a query vector
    ///
    /// Returns at most `params.limit` scored documents, best first,
    /// honoring the score threshold and filter when set.
    async fn search(&self, query: &[f32], params: &SearchParams) -> Result<Vec<ScoredMatch>>;

    /// Query by predicate only, without a vector
    async fn find(&self, filter: &FilterExpr, limit: Option<usize>) -> Result<Vec<Document>>;

    /// Remove every document
    async fn clear(&self) -> Result<()>;

    /// Number of stored documents
    async fn count(&self) -> Result<usize>;
}
