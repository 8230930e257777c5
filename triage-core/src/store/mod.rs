//! Store seams for the two document collections and the query log.
//!
//! The workflows depend on these traits, never on a concrete client; the
//! composition root injects the Postgres implementations, tests inject
//! in-memory fakes. The aggregate board and the knowledge collection are
//! independently owned stores with no transactional linkage.

mod postgres;

pub use postgres::{PgBoardStore, PgKnowledgeStore, PgQueryLog};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewKnowledgeRecord, QueryRecord, QuestionBoard};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The aggregate question record, one per clinic. Exactly the two operations
/// the intake workflow needs: read the whole record, and merge a single
/// answer in without disturbing other keys.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// `Ok(None)` when no record exists yet — callers treat that as an empty
    /// board, not an error.
    async fn fetch(&self) -> Result<Option<QuestionBoard>, StoreError>;

    /// Merge-write one answer under its question key. Creates the record if
    /// missing; every other key is preserved. Last write wins for the same
    /// key, with no conflict detection.
    async fn merge_answer(&self, question: &str, answer: &str) -> Result<(), StoreError>;
}

/// Append-only knowledge collection. Write-only from this service.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn insert(&self, record: NewKnowledgeRecord) -> Result<Uuid, StoreError>;
}

/// The chat system's interaction log. Most recent first; an empty log is an
/// empty vec, not an error.
#[async_trait]
pub trait QueryLogStore: Send + Sync {
    async fn recent(&self, limit: usize) -> Result<Vec<QueryRecord>, StoreError>;
}
