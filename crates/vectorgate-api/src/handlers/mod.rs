mod documents;
mod health;
mod search;

pub use documents::{clear_index, delete_docs, fill_embedding, index_docs, update_docs};
pub use health::{health_check, status};
pub use search::{filter_docs, search_docs};
