//! Document / point conversion
//!
//! The backend only accepts integers or UUIDs as point ids, so free-form
//! document ids map to deterministic UUIDv5 values. The original id, the
//! text content, and every tag live in the point payload; `_id` and `_text`
//! are reserved keys.

use std::collections::HashMap;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors::VectorsOptions;
use qdrant_client::qdrant::{PointStruct, Value as QdrantValue, Vectors};
use qdrant_client::Payload;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use vectorgate_core::error::{Result, VectorgateError};
use vectorgate_core::models::{DocId, Document};

pub(crate) const ID_KEY: &str = "_id";
pub(crate) const TEXT_KEY: &str = "_text";

/// Deterministic point id for a document id
pub(crate) fn point_id(id: &DocId) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_str().as_bytes()).to_string()
}

/// Build the point written for a document.
///
/// The backend requires a vector for every point; documents indexed
/// without an embedding get zeros of the collection dimensionality.
pub(crate) fn to_point(doc: &Document, dim: usize) -> Result<PointStruct> {
    let mut payload = serde_json::Map::new();
    payload.insert(ID_KEY.to_string(), JsonValue::String(doc.id.0.clone()));
    if let Some(text) = &doc.text {
        payload.insert(TEXT_KEY.to_string(), JsonValue::String(text.clone()));
    }
    for (key, value) in &doc.tags {
        payload.insert(key.clone(), value.clone());
    }

    let payload = Payload::try_from(JsonValue::Object(payload))
        .map_err(|e| VectorgateError::Serialization(e.to_string()))?;

    let vector = doc.embedding.clone().unwrap_or_else(|| vec![0.0; dim]);

    Ok(PointStruct::new(point_id(&doc.id), vector, payload))
}

/// Rebuild a document from a returned payload and vector
pub(crate) fn from_parts(
    payload: HashMap<String, QdrantValue>,
    vector: Option<Vec<f32>>,
) -> Document {
    let mut id = String::new();
    let mut text = None;
    let mut tags = HashMap::new();

    for (key, value) in payload {
        let json = json_value(value);
        match key.as_str() {
            ID_KEY => {
                if let JsonValue::String(s) = json {
                    id = s;
                }
            }
            TEXT_KEY => {
                if let JsonValue::String(s) = json {
                    text = Some(s);
                }
            }
            _ => {
                tags.insert(key, json);
            }
        }
    }

    Document {
        id: DocId(id),
        text,
        embedding: vector,
        tags,
        matches: Vec::new(),
    }
}

/// Extract the dense vector from a returned point
pub(crate) fn vector_data(vectors: Option<Vectors>) -> Option<Vec<f32>> {
    match vectors?.vectors_options? {
        VectorsOptions::Vector(v) => Some(v.data),
        VectorsOptions::Vectors(_) => None,
    }
}

fn json_value(value: QdrantValue) -> JsonValue {
    match value.kind {
        None | Some(Kind::NullValue(_)) => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(b),
        Some(Kind::IntegerValue(i)) => JsonValue::from(i),
        Some(Kind::DoubleValue(d)) => {
            serde_json::Number::from_f64(d).map(JsonValue::Number).unwrap_or(JsonValue::Null)
        }
        Some(Kind::StringValue(s)) => JsonValue::String(s),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.into_iter().map(json_value).collect())
        }
        Some(Kind::StructValue(s)) => {
            JsonValue::Object(s.fields.into_iter().map(|(k, v)| (k, json_value(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_is_deterministic() {
        let id: DocId = "doc1".into();
        assert_eq!(point_id(&id), point_id(&id));
        assert_ne!(point_id(&id), point_id(&"doc2".into()));
        // must parse as a UUID, the only string form the backend accepts
        assert!(Uuid::parse_str(&point_id(&id)).is_ok());
    }

    #[test]
    fn test_to_point_carries_payload() {
        let doc = Document::new("doc1")
            .with_text("hello")
            .with_embedding(vec![1.0, 2.0])
            .with_tag("price", 3);
        let point = to_point(&doc, 2).unwrap();

        assert_eq!(json_value(point.payload[ID_KEY].clone()), serde_json::json!("doc1"));
        assert_eq!(json_value(point.payload[TEXT_KEY].clone()), serde_json::json!("hello"));
        assert_eq!(json_value(point.payload["price"].clone()), serde_json::json!(3));
    }

    #[test]
    fn test_to_point_zero_fills_missing_embedding() {
        let doc = Document::new("doc1").with_text("hello");
        let point = to_point(&doc, 3).unwrap();
        let data = vector_data(point.vectors).unwrap();
        assert_eq!(data, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_parts_restores_document() {
        let doc = Document::new("doc1")
            .with_text("hello")
            .with_embedding(vec![1.0, 2.0])
            .with_tag("price", 3);
        let point = to_point(&doc, 2).unwrap();

        let restored = from_parts(point.payload, vector_data(point.vectors));

        assert_eq!(restored.id.as_str(), "doc1");
        assert_eq!(restored.text.as_deref(), Some("hello"));
        assert_eq!(restored.embedding, Some(vec![1.0, 2.0]));
        assert_eq!(restored.tags["price"], serde_json::json!(3));
    }
}
