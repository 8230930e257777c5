pub mod board;
pub mod knowledge;
pub mod query_log;

pub use board::QuestionBoard;
pub use knowledge::{NewKnowledgeRecord, KNOWLEDGE_STATUS_UNANSWERED};
pub use query_log::QueryRecord;
