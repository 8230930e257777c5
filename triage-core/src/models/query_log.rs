use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user interaction from the chat system's log. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueryRecord {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub ts: DateTime<Utc>,
}
