//! Qdrant storage adapter
//!
//! Every operation is a delegation to the external client library; the
//! adapter only reshapes arguments. Indexing, distance computation,
//! persistence, and replica consistency are the remote service's.

pub(crate) mod convert;
pub(crate) mod filter;

use async_trait::async_trait;

use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder,
    DeletePointsBuilder, Distance as QdrantDistance, FieldType, GetPointsBuilder,
    HnswConfigDiffBuilder, PointId, PointsIdsList, ScrollPointsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;

use vectorgate_core::config::{ColumnKind, ConnectorConfig, Distance};
use vectorgate_core::error::{Result, VectorgateError};
use vectorgate_core::filter::FilterExpr;
use vectorgate_core::models::{DocId, Document, ScoredMatch, SearchParams};

use crate::ports::DocumentIndex;
use self::convert::{from_parts, point_id, to_point, vector_data};
use self::filter::to_qdrant_filter;

/// Qdrant-backed implementation of `DocumentIndex`
pub struct QdrantIndex {
    client: Qdrant,
    config: ConnectorConfig,
    dim: usize,
}

impl QdrantIndex {
    /// Connect to the backend and ensure the collection exists
    pub async fn connect(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let dim = config
            .dim
            .ok_or_else(|| VectorgateError::ConfigMissing { key: "dim".to_string() })?;

        let client =
            Qdrant::from_url(&config.url()).build().map_err(VectorgateError::backend)?;

        let index = Self { client, config, dim };
        index.ensure_collection().await?;
        Ok(index)
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    async fn ensure_collection(&self) -> Result<()> {
        let collection = self.config.collection.as_str();

        let exists = self
            .client
            .collection_exists(collection)
            .await
            .map_err(VectorgateError::backend)?;
        if exists {
            return Ok(());
        }

        tracing::info!(
            collection = %collection,
            dim = self.dim,
            distance = self.config.distance.as_str(),
            "Creating collection"
        );

        let mut vectors =
            VectorParamsBuilder::new(self.dim as u64, qdrant_distance(self.config.distance));
        if self.config.on_disk {
            vectors = vectors.on_disk(true);
        }

        let mut create = CreateCollectionBuilder::new(collection).vectors_config(vectors);
        if !self.config.hnsw.is_empty() {
            let mut hnsw = HnswConfigDiffBuilder::default();
            if let Some(m) = self.config.hnsw.m {
                hnsw = hnsw.m(m);
            }
            if let Some(ef_construct) = self.config.hnsw.ef_construct {
                hnsw = hnsw.ef_construct(ef_construct);
            }
            if let Some(threshold) = self.config.hnsw.full_scan_threshold {
                hnsw = hnsw.full_scan_threshold(threshold);
            }
            create = create.hnsw_config(hnsw);
        }

        self.client.create_collection(create).await.map_err(VectorgateError::backend)?;

        for column in &self.config.columns {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    collection,
                    column.name.as_str(),
                    field_type(column.kind),
                ))
                .await
                .map_err(VectorgateError::backend)?;
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentIndex for QdrantIndex {
    async fn extend(&self, docs: &[Document]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }

        let points =
            docs.iter().map(|doc| to_point(doc, self.dim)).collect::<Result<Vec<_>>>()?;

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(self.config.collection.as_str(), points).wait(true),
            )
            .await
            .map_err(VectorgateError::backend)?;

        Ok(())
    }

    async fn replace(&self, doc: &Document) -> Result<()> {
        let collection = self.config.collection.as_str();
        let pid: PointId = point_id(&doc.id).into();

        let existing = self
            .client
            .get_points(
                GetPointsBuilder::new(collection, vec![pid])
                    .with_payload(false)
                    .with_vectors(false),
            )
            .await
            .map_err(VectorgateError::backend)?;

        if existing.result.is_empty() {
            return Err(VectorgateError::DocumentNotFound { id: doc.id.to_string() });
        }

        let point = to_point(doc, self.dim)?;
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![point]).wait(true))
            .await
            .map_err(VectorgateError::backend)?;

        Ok(())
    }

    async fn delete(&self, ids: &[DocId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<PointId> = ids.iter().map(|id| point_id(id).into()).collect();

        self.client
            .delete_points(
                DeletePointsBuilder::new(self.config.collection.as_str())
                    .points(PointsIdsList { ids })
                    .wait(true),
            )
            .await
            .map_err(VectorgateError::backend)?;

        Ok(())
    }

    async fn embedding(&self, id: &DocId) -> Result<Vec<f32>> {
        let pid: PointId = point_id(id).into();

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(self.config.collection.as_str(), vec![pid])
                    .with_payload(false)
                    .with_vectors(true),
            )
            .await
            .map_err(VectorgateError::backend)?;

        let point = response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| VectorgateError::DocumentNotFound { id: id.to_string() })?;

        vector_data(point.vectors)
            .ok_or_else(|| VectorgateError::MissingEmbedding { id: id.to_string() })
    }

    async fn search(&self, query: &[f32], params: &SearchParams) -> Result<Vec<ScoredMatch>> {
        let mut request = SearchPointsBuilder::new(
            self.config.collection.as_str(),
            query.to_vec(),
            params.limit as u64,
        )
        .with_payload(true)
        .with_vectors(true);

        if let Some(filter) = &params.filter {
            request = request.filter(to_qdrant_filter(filter));
        }
        if let Some(threshold) = params.score_threshold {
            request = request.score_threshold(threshold);
        }

        let response =
            self.client.search_points(request).await.map_err(VectorgateError::backend)?;

        Ok(response
            .result
            .into_iter()
            .map(|point| ScoredMatch {
                score: point.score,
                doc: from_parts(point.payload, vector_data(point.vectors)),
            })
            .collect())
    }

    async fn find(&self, filter: &FilterExpr, limit: Option<usize>) -> Result<Vec<Document>> {
        let collection = self.config.collection.as_str();
        let qdrant_filter = to_qdrant_filter(filter);

        let mut out = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut request = ScrollPointsBuilder::new(collection)
                .filter(qdrant_filter.clone())
                .limit(self.config.scroll_batch_size)
                .with_payload(true)
                .with_vectors(true);
            if let Some(o) = offset.take() {
                request = request.offset(o);
            }

            let response = self.client.scroll(request).await.map_err(VectorgateError::backend)?;

            for point in response.result {
                out.push(from_parts(point.payload, vector_data(point.vectors)));
                if limit.is_some_and(|l| out.len() >= l) {
                    return Ok(out);
                }
            }

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(out)
    }

    async fn clear(&self) -> Result<()> {
        self.client
            .delete_collection(self.config.collection.as_str())
            .await
            .map_err(VectorgateError::backend)?;
        self.ensure_collection().await
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(self.config.collection.as_str()).exact(true))
            .await
            .map_err(VectorgateError::backend)?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }
}

fn qdrant_distance(distance: Distance) -> QdrantDistance {
    match distance {
        Distance::Cosine => QdrantDistance::Cosine,
        Distance::Euclidean => QdrantDistance::Euclid,
        Distance::Dot => QdrantDistance::Dot,
    }
}

fn field_type(kind: ColumnKind) -> FieldType {
    match kind {
        ColumnKind::Keyword => FieldType::Keyword,
        ColumnKind::Integer => FieldType::Integer,
        ColumnKind::Float => FieldType::Float,
        ColumnKind::Bool => FieldType::Bool,
    }
}
