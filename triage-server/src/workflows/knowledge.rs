//! Knowledge recorder — embeds a question and appends the Q&A pair to the
//! collection the downstream chat system retrieves from.
//!
//! Write-only and append-only: no read, update, or delete is exposed, and
//! nothing deduplicates a resubmitted question.

use std::sync::Arc;

use triage_core::embeddings::EmbeddingBackend;
use triage_core::error::TriageError;
use triage_core::models::NewKnowledgeRecord;
use triage_core::store::KnowledgeStore;
use uuid::Uuid;

pub struct KnowledgeRecorder {
    embedder: Arc<dyn EmbeddingBackend>,
    store: Arc<dyn KnowledgeStore>,
}

impl KnowledgeRecorder {
    pub fn new(embedder: Arc<dyn EmbeddingBackend>, store: Arc<dyn KnowledgeStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed the question text and append a new knowledge record.
    ///
    /// The embedding call happens first; if it fails nothing is written.
    pub async fn record(&self, question: &str, answer: &str) -> Result<Uuid, TriageError> {
        let embedding = self.embedder.embed(question).await?;
        let record = NewKnowledgeRecord::unanswered(question, answer, embedding);

        let id = self
            .store
            .insert(record)
            .await
            .map_err(TriageError::StoreWrite)?;

        tracing::info!(id = %id, backend = self.embedder.name(), "Stored knowledge record");
        Ok(id)
    }

    /// Manual-add path: both fields are clinician-typed, so both are trimmed
    /// and validated. Does not touch the aggregate question record.
    pub async fn add_manual(&self, question: &str, answer: &str) -> Result<Uuid, TriageError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TriageError::EmptyQuestion);
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(TriageError::EmptyAnswer);
        }

        self.record(question, answer).await
    }
}
