use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::filter::FilterExpr;

/// Unique identifier for a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(pub String);

impl DocId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocId {
    fn from(value: &str) -> Self {
        DocId(value.to_string())
    }
}

impl From<String> for DocId {
    fn from(value: String) -> Self {
        DocId(value)
    }
}

/// An opaque document record passed through to the storage backend.
///
/// The connector asserts no invariants over document content. Tags and
/// match results are free-form; their structure is owned by the caller
/// and the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocId,

    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Embedding vector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Free-form payload
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, serde_json::Value>,

    /// Nearest-neighbor results attached by a search
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<ScoredMatch>,
}

impl Document {
    /// Create an empty document with the given id
    pub fn new(id: impl Into<DocId>) -> Self {
        Self {
            id: id.into(),
            text: None,
            embedding: None,
            tags: HashMap::new(),
            matches: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A matched document with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub score: f32,
    pub doc: Document,
}

/// Configured default match arguments, applied to every search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Maximum number of matches per query document
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Minimum score for a match to be returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,

    /// Restrict matches to documents satisfying this predicate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpr>,
}

fn default_limit() -> usize {
    10
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            score_threshold: None,
            filter: None,
        }
    }
}

impl SearchDefaults {
    /// Merge per-request overrides over these defaults.
    ///
    /// Fields present in the overrides win; absent fields keep the
    /// configured value.
    pub fn merge(&self, overrides: Option<&SearchOverrides>) -> SearchParams {
        let base = SearchParams {
            limit: self.limit,
            score_threshold: self.score_threshold,
            filter: self.filter.clone(),
        };
        match overrides {
            None => base,
            Some(ov) => SearchParams {
                limit: ov.limit.unwrap_or(base.limit),
                score_threshold: ov.score_threshold.or(base.score_threshold),
                filter: ov.filter.clone().or(base.filter),
            },
        }
    }
}

/// Per-request match arguments; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpr>,
}

/// Effective match arguments handed to the storage backend
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub limit: usize,
    pub score_threshold: Option<f32>,
    pub filter: Option<FilterExpr>,
}
