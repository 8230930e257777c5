use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::store::StoreError;

/// Failures surfaced by the intake and review workflows.
///
/// Every failure aborts the current operation and is reported to the caller
/// as-is; there is no retry and no transient/permanent distinction.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("failed to read from store: {0}")]
    Retrieval(#[source] StoreError),

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("failed to write to store: {0}")]
    StoreWrite(#[source] StoreError),
}
