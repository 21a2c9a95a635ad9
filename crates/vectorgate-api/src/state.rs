use std::sync::Arc;

use vectorgate_core::config::{ConnectorConfig, Distance};
use vectorgate_core::models::SearchDefaults;
use vectorgate_store::ports::DocumentIndex;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<dyn DocumentIndex>,
    pub collection: String,
    pub distance: Distance,
    pub search_defaults: SearchDefaults,
}

impl AppState {
    pub fn new(index: Arc<dyn DocumentIndex>, config: &ConnectorConfig) -> Self {
        Self {
            index,
            collection: config.collection.clone(),
            distance: config.distance,
            search_defaults: config.search.clone(),
        }
    }
}
