use serde::Serialize;

use vectorgate_core::models::Document;

/// Index operation response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub indexed: usize,
}

/// Response carrying documents back to the caller
#[derive(Debug, Serialize)]
pub struct DocsResponse {
    pub docs: Vec<Document>,
}

/// Update operation response
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub updated: usize,

    /// Ids skipped because they were not in storage
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

/// Generic operation response
#[derive(Debug, Serialize)]
pub struct OpResponse {
    pub success: bool,
    pub message: String,
}

impl OpResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "vectorgate-api" }
    }
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub collection: String,
    pub distance: &'static str,
    pub count: usize,
}
