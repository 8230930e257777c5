//! Knowledge records: Q&A pairs plus the embedding of the question text,
//! appended to the collection the downstream chat system retrieves from.

/// Status label stamped on every knowledge record, including ones created via
/// the manual-add path. Historical: the downstream reader filters on this
/// exact literal, so it stays even where "unanswered" no longer describes how
/// the record was created.
pub const KNOWLEDGE_STATUS_UNANSWERED: &str = "unanswered";

/// A new Q&A pair to append. Records are never updated or deleted by this
/// service, and nothing deduplicates resubmissions.
#[derive(Debug, Clone)]
pub struct NewKnowledgeRecord {
    pub status: String,
    pub question: String,
    pub answer: String,
    pub embedding: Vec<f32>,
}

impl NewKnowledgeRecord {
    pub fn unanswered(question: &str, answer: &str, embedding: Vec<f32>) -> Self {
        Self {
            status: KNOWLEDGE_STATUS_UNANSWERED.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            embedding,
        }
    }
}
