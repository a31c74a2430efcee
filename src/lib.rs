pub mod config;
pub mod context;
pub mod discovery;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod indexer;
pub mod logging;
pub mod models;
pub mod query;
pub mod store;
pub mod utils;

pub use context::AppContext;
pub use discovery::FileDiscovery;
pub use embeddings::EmbeddingProvider;
pub use error::{ExtractError, IndexError, StoreError};
pub use extractor::TextExtractor;
pub use indexer::{DocumentIndexer, FileOutcome, IndexReport};
pub use models::SearchResult;
pub use query::QueryEngine;
pub use store::{IndexStore, LocalVectorStore, VectorStore};
