pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod models;
pub mod store;

pub use config::TriageConfig;
pub use embeddings::{
    EmbeddingBackend, EmbeddingConfig, EmbeddingError, OpenAiEmbeddingClient,
    DEFAULT_EMBEDDING_MODEL, OPENAI_DIMENSIONS,
};
pub use error::TriageError;
pub use store::StoreError;
