mod request;
mod response;

pub use request::{
    DeleteRequest, FillEmbeddingRequest, FilterRequest, IndexRequest, SearchRequest,
    UpdateRequest,
};
pub use response::{
    DocsResponse, HealthResponse, IndexResponse, OpResponse, StatusResponse, UpdateResponse,
};
