//! Connector configuration
//!
//! The configuration record is forwarded to the storage backend unmodified;
//! this module only loads and validates it. Loading is layered: struct
//! defaults, then an optional TOML file, then `VECTORGATE_*` environment
//! variables. Invalid environment values are logged and ignored.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, VectorgateError};
use crate::models::SearchDefaults;

/// Distance metric used by the backend collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

impl Distance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Distance::Cosine => "cosine",
            Distance::Euclidean => "euclidean",
            Distance::Dot => "dot",
        }
    }
}

impl FromStr for Distance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Distance::Cosine),
            "euclidean" | "euclid" => Ok(Distance::Euclidean),
            "dot" => Ok(Distance::Dot),
            other => Err(format!("unknown distance metric '{other}'")),
        }
    }
}

/// Payload column kind for typed filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Keyword,
    Integer,
    Float,
    Bool,
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "str" | "keyword" => Ok(ColumnKind::Keyword),
            "int" | "integer" => Ok(ColumnKind::Integer),
            "float" => Ok(ColumnKind::Float),
            "bool" => Ok(ColumnKind::Bool),
            other => Err(format!("unknown column kind '{other}'")),
        }
    }
}

/// A payload column the backend should index for filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Index construction parameters, forwarded to the backend as-is
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Number of graph edges per node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u64>,

    /// Construction-time beam width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_construct: Option<u64>,

    /// Below this point count the backend scans instead of using the graph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_scan_threshold: Option<u64>,
}

impl HnswConfig {
    pub fn is_empty(&self) -> bool {
        self.m.is_none() && self.ef_construct.is_none() && self.full_scan_threshold.is_none()
    }
}

/// Connection and collection configuration for the storage backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Backend host
    pub host: String,
    /// Backend gRPC port
    pub port: u16,
    /// Collection name
    pub collection: String,
    /// Distance metric
    pub distance: Distance,
    /// Embedding dimensionality; required by the remote backend
    pub dim: Option<usize>,
    /// Index construction parameters
    #[serde(default)]
    pub hnsw: HnswConfig,
    /// Page size for predicate queries
    pub scroll_batch_size: u32,
    /// Store vectors and payloads on disk rather than in memory
    pub on_disk: bool,
    /// Payload columns indexed for filtering
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    /// Default match arguments
    #[serde(default)]
    pub search: SearchDefaults,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6334,
            collection: "persisted".to_string(),
            distance: Distance::Cosine,
            dim: None,
            hnsw: HnswConfig::default(),
            scroll_batch_size: 64,
            on_disk: false,
            columns: Vec::new(),
            search: SearchDefaults::default(),
        }
    }
}

/// Partial configuration as it appears in a TOML file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    collection: Option<String>,
    distance: Option<Distance>,
    dim: Option<usize>,
    hnsw: Option<HnswConfig>,
    scroll_batch_size: Option<u32>,
    on_disk: Option<bool>,
    columns: Option<Vec<ColumnSpec>>,
    search: Option<SearchDefaults>,
}

impl ConnectorConfig {
    /// Overlay values from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            VectorgateError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            }
        })?;

        let file: FileConfig = toml::from_str(&content).map_err(|e| {
            VectorgateError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            }
        })?;

        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(collection) = file.collection {
            self.collection = collection;
        }
        if let Some(distance) = file.distance {
            self.distance = distance;
        }
        if let Some(dim) = file.dim {
            self.dim = Some(dim);
        }
        if let Some(hnsw) = file.hnsw {
            self.hnsw = hnsw;
        }
        if let Some(batch) = file.scroll_batch_size {
            self.scroll_batch_size = batch;
        }
        if let Some(on_disk) = file.on_disk {
            self.on_disk = on_disk;
        }
        if let Some(columns) = file.columns {
            self.columns = columns;
        }
        if let Some(search) = file.search {
            self.search = search;
        }

        Ok(self)
    }

    /// Overlay values from `VECTORGATE_*` environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(host) = env::var("VECTORGATE_HOST") {
            self.host = host;
        }

        if let Ok(port_str) = env::var("VECTORGATE_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(
                    "Invalid VECTORGATE_PORT value '{}': expected integer port",
                    port_str
                ),
            }
        }

        if let Ok(collection) = env::var("VECTORGATE_COLLECTION") {
            self.collection = collection;
        }

        if let Ok(distance_str) = env::var("VECTORGATE_DISTANCE") {
            match distance_str.parse::<Distance>() {
                Ok(distance) => self.distance = distance,
                Err(reason) => {
                    tracing::warn!("Invalid VECTORGATE_DISTANCE value: {}", reason)
                }
            }
        }

        if let Ok(dim_str) = env::var("VECTORGATE_DIM") {
            match dim_str.parse::<usize>() {
                Ok(dim) => self.dim = Some(dim),
                Err(_) => tracing::warn!(
                    "Invalid VECTORGATE_DIM value '{}': expected integer dimensionality",
                    dim_str
                ),
            }
        }

        if let Ok(batch_str) = env::var("VECTORGATE_SCROLL_BATCH_SIZE") {
            match batch_str.parse::<u32>() {
                Ok(batch) => self.scroll_batch_size = batch,
                Err(_) => tracing::warn!(
                    "Invalid VECTORGATE_SCROLL_BATCH_SIZE value '{}': expected integer",
                    batch_str
                ),
            }
        }

        if let Ok(on_disk_str) = env::var("VECTORGATE_ON_DISK") {
            match on_disk_str.parse::<bool>() {
                Ok(on_disk) => self.on_disk = on_disk,
                Err(_) => tracing::warn!(
                    "Invalid VECTORGATE_ON_DISK value '{}': expected true or false",
                    on_disk_str
                ),
            }
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(VectorgateError::ConfigInvalid {
                key: "collection".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.scroll_batch_size == 0 {
            return Err(VectorgateError::ConfigInvalid {
                key: "scroll_batch_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.dim == Some(0) {
            return Err(VectorgateError::ConfigInvalid {
                key: "dim".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if let Some(col) = self.columns.iter().find(|c| c.name.trim().is_empty()) {
            return Err(VectorgateError::ConfigInvalid {
                key: "columns".to_string(),
                reason: format!("column with kind {:?} has an empty name", col.kind),
            });
        }

        Ok(())
    }

    /// Backend endpoint URL
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6334);
        assert_eq!(config.collection, "persisted");
        assert_eq!(config.distance, Distance::Cosine);
        assert_eq!(config.scroll_batch_size, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_collection() {
        let config = ConnectorConfig {
            collection: "  ".to_string(),
            ..Default::default()
        };
        match config.validate() {
            Err(VectorgateError::ConfigInvalid { key, .. }) => assert_eq!(key, "collection"),
            other => panic!("Expected ConfigInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_zero_scroll_batch() {
        let config = ConnectorConfig {
            scroll_batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_dim() {
        let config = ConnectorConfig {
            dim: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_distance_from_str() {
        assert_eq!("cosine".parse::<Distance>().unwrap(), Distance::Cosine);
        assert_eq!("euclid".parse::<Distance>().unwrap(), Distance::Euclidean);
        assert_eq!("Dot".parse::<Distance>().unwrap(), Distance::Dot);
        assert!("hamming".parse::<Distance>().is_err());
    }

    #[test]
    fn test_column_kind_aliases() {
        assert_eq!("str".parse::<ColumnKind>().unwrap(), ColumnKind::Keyword);
        assert_eq!("int".parse::<ColumnKind>().unwrap(), ColumnKind::Integer);
        assert_eq!("float".parse::<ColumnKind>().unwrap(), ColumnKind::Float);
    }

    #[test]
    fn test_url() {
        let config = ConnectorConfig {
            host: "qdrant.internal".to_string(),
            port: 7000,
            ..Default::default()
        };
        assert_eq!(config.url(), "http://qdrant.internal:7000");
    }
}
